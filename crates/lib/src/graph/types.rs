use thiserror::Error;

/// Errors that can occur while building a graph definition.
#[derive(Debug, Error)]
pub enum GraphError {
  /// A vertex could not be serialized for hashing.
  #[error("failed to serialize vertex: {0}")]
  Serialize(#[from] serde_json::Error),

  /// Local sources must name an absolute host path.
  #[error("local source must be an absolute path, got {name:?}")]
  InvalidLocalSource { name: String },

  /// Copy source and destination must both be set.
  #[error("copy source and destination paths must not be empty")]
  EmptyCopyPath,

  /// Scratch has no vertex and cannot feed another op.
  #[error("scratch cannot be used as an op input")]
  ScratchInput,

  /// Cycle detected in the graph.
  #[error("dependency cycle detected")]
  CycleDetected,
}
