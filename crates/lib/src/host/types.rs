use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::graph::GraphError;

/// Errors that can occur while touching the host filesystem.
#[derive(Debug, Error)]
pub enum HostError {
  /// Host reads and writes are switched off for this host.
  #[error("host directory/file access is disabled")]
  RwDisabled,

  /// A relative path lexically left the workdir.
  #[error("path {path:?} escapes workdir; use an absolute path instead")]
  EscapesWorkdir { path: PathBuf },

  /// A relative export destination left the workdir.
  #[error("destination {dest:?} escapes workdir; use an absolute path instead")]
  DestEscapesWorkdir { dest: PathBuf },

  /// Symlinks in the path could not be resolved.
  #[error("failed to eval symlinks for {path:?}: {source}")]
  Symlinks {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The path is not valid UTF-8 and cannot name an upload losslessly.
  #[error("path {path:?} is not valid UTF-8")]
  NonUtf8Path { path: PathBuf },

  /// A file was requested but the path has no file name.
  #[error("path {path:?} does not name a file")]
  InvalidFilePath { path: PathBuf },

  #[error(transparent)]
  Graph(#[from] GraphError),

  /// The graph client failed to build or export.
  #[error("build failed: {0}")]
  Build(#[source] Box<dyn StdError + Send + Sync>),

  /// The status mirror task did not finish cleanly.
  #[error("status mirror failed: {0}")]
  StatusMirror(#[source] tokio::task::JoinError),
}
