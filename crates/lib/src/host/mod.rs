//! Controlled access to the host filesystem.
//!
//! A [`Host`] turns host paths into build-graph nodes. Every access goes
//! through the same steps:
//!
//! 1. refuse everything when read/write access is disabled
//! 2. confine relative paths to the workdir ([`confine`])
//! 3. resolve symlinks in the confined path
//!
//! The materializing operations ([`Host::directory`], [`Host::file`]) and the
//! export pipeline ([`Host::export`](crate::export)) build on this.

mod confine;
mod materialize;
mod types;

use std::path::{Path, PathBuf};

use tracing::debug;

pub use confine::{clean_path, confine, upload_key};
pub use materialize::CopyFilter;
pub use types::HostError;

use crate::config::HostConfig;
use crate::graph::HostSocket;
use crate::progress::ProgressRecorder;

/// The host side of a build session.
#[derive(Debug, Clone)]
pub struct Host {
  config: HostConfig,
  recorder: ProgressRecorder,
}

impl Host {
  pub fn new(config: HostConfig) -> Self {
    Self::with_recorder(config, ProgressRecorder::new())
  }

  /// Create a host that attributes its vertices through `recorder`.
  pub fn with_recorder(config: HostConfig, recorder: ProgressRecorder) -> Self {
    Self { config, recorder }
  }

  pub fn config(&self) -> &HostConfig {
    &self.config
  }

  pub fn recorder(&self) -> &ProgressRecorder {
    &self.recorder
  }

  pub(crate) fn ensure_rw(&self) -> Result<(), HostError> {
    if self.config.disable_rw() {
      return Err(HostError::RwDisabled);
    }
    Ok(())
  }

  /// Confine `requested` to the workdir and resolve its symlinks.
  ///
  /// The path must exist. The symlink target may lie outside the workdir;
  /// only the requested path is checked.
  pub fn resolve_path(&self, requested: impl AsRef<Path>) -> Result<PathBuf, HostError> {
    self.ensure_rw()?;
    let requested = requested.as_ref();
    let confined = confine(self.config.workdir(), requested)?;
    let resolved = dunce::canonicalize(&confined).map_err(|source| HostError::Symlinks {
      path: confined.clone(),
      source,
    })?;
    debug!(requested = %requested.display(), resolved = %resolved.display(), "resolved host path");
    Ok(resolved)
  }

  /// A host unix socket, forwarded into builds by its resolved path.
  pub fn socket(&self, path: impl AsRef<Path>) -> Result<HostSocket, HostError> {
    let resolved = self.resolve_path(path)?;
    Ok(HostSocket::new(resolved))
  }

  /// Resolve an export destination.
  ///
  /// Absolute destinations are returned unchanged. Relative ones are placed
  /// under the symlink-resolved workdir and may not leave it.
  pub fn normalize_dest(&self, dest: impl AsRef<Path>) -> Result<PathBuf, HostError> {
    let dest = dest.as_ref();
    if dest.is_absolute() {
      return Ok(dest.to_path_buf());
    }

    let workdir = self.config.workdir();
    let root = dunce::canonicalize(workdir).map_err(|source| HostError::Symlinks {
      path: workdir.to_path_buf(),
      source,
    })?;
    let normalized = clean_path(&root.join(dest));
    if !normalized.starts_with(&root) {
      return Err(HostError::DestEscapesWorkdir { dest: normalized });
    }
    Ok(normalized)
  }
}
