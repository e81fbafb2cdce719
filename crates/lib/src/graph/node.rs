//! Build-graph nodes handed to callers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::definition::Definition;
use crate::pipeline::PipelinePath;
use crate::platform::Platform;
use crate::util::hash::Digest;

/// A directory inside a build graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
  pub definition: Definition,
  /// Path of the directory within the definition's output filesystem.
  pub dir: String,
  pub pipeline: PipelinePath,
  pub platform: Platform,
}

impl Directory {
  pub fn new(definition: Definition, dir: impl Into<String>, pipeline: PipelinePath, platform: Platform) -> Self {
    Self {
      definition,
      dir: dir.into(),
      pipeline,
      platform,
    }
  }

  /// Digest of the vertex this directory evaluates to.
  pub fn digest(&self) -> Option<&Digest> {
    self.definition.output.as_ref()
  }
}

/// A single file inside a build graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
  pub definition: Definition,
  /// Path of the file within the definition's output filesystem.
  pub file: String,
  pub pipeline: PipelinePath,
  pub platform: Platform,
}

impl File {
  pub fn new(definition: Definition, file: impl Into<String>, pipeline: PipelinePath, platform: Platform) -> Self {
    Self {
      definition,
      file: file.into(),
      pipeline,
      platform,
    }
  }

  pub fn digest(&self) -> Option<&Digest> {
    self.definition.output.as_ref()
  }
}

/// A unix socket on the host, forwarded into builds by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostSocket {
  pub host_path: PathBuf,
}

impl HostSocket {
  pub fn new(host_path: impl Into<PathBuf>) -> Self {
    Self {
      host_path: host_path.into(),
    }
  }

  pub fn host_path(&self) -> &Path {
    &self.host_path
  }
}
