//! Host access configuration.
//!
//! The workdir and the read/write kill switch are fixed when a
//! [`Host`](crate::host::Host) is built and never change afterwards. They can
//! be injected directly with [`HostConfig::new`] or read from the environment:
//!
//! - `STRATA_WORKDIR`: root relative host paths are confined to (default: the
//!   current directory; relative values resolve against it)
//! - `STRATA_DISABLE_HOST_RW`: `1`/`true`/`yes`/`on` to refuse all host access

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{DISABLE_RW_ENV, WORKDIR_ENV};
use crate::host::clean_path;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid boolean {value:?} for {var}")]
  InvalidBool { var: &'static str, value: String },

  #[error("failed to determine current directory: {0}")]
  CurrentDir(#[source] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
  workdir: PathBuf,
  disable_rw: bool,
}

impl HostConfig {
  /// Build a configuration from explicit values.
  ///
  /// A relative `workdir` is resolved against the current directory. The
  /// result is cleaned lexically so confinement compares like with like.
  pub fn new(workdir: impl AsRef<Path>, disable_rw: bool) -> Result<Self, ConfigError> {
    let workdir = workdir.as_ref();
    let workdir = if workdir.is_absolute() {
      workdir.to_path_buf()
    } else {
      std::env::current_dir().map_err(ConfigError::CurrentDir)?.join(workdir)
    };

    Ok(Self {
      workdir: clean_path(&workdir),
      disable_rw,
    })
  }

  /// Read the configuration from `STRATA_WORKDIR` and `STRATA_DISABLE_HOST_RW`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let workdir = match std::env::var_os(WORKDIR_ENV) {
      Some(dir) if !dir.is_empty() => PathBuf::from(dir),
      _ => PathBuf::from("."),
    };

    let disable_rw = match std::env::var(DISABLE_RW_ENV) {
      Ok(value) => parse_bool(DISABLE_RW_ENV, &value)?,
      Err(_) => false,
    };

    Self::new(workdir, disable_rw)
  }

  pub fn workdir(&self) -> &Path {
    &self.workdir
  }

  pub fn disable_rw(&self) -> bool {
    self.disable_rw
  }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "" | "0" | "false" | "no" | "off" => Ok(false),
    "1" | "true" | "yes" | "on" => Ok(true),
    _ => Err(ConfigError::InvalidBool {
      var,
      value: value.to_string(),
    }),
  }
}
