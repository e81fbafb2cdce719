//! Turning host directories and files into build-graph nodes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use super::confine::{path_str, upload_key};
use super::types::HostError;
use super::Host;
use crate::consts::FILE_OUTPUT_PATH;
use crate::graph::{Directory, File, LocalOptions, State};
use crate::pipeline::PipelinePath;
use crate::platform::Platform;

/// Glob patterns restricting which entries of a host directory are uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFilter {
  pub include: Vec<String>,
  pub exclude: Vec<String>,
}

impl CopyFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn include(mut self, pattern: impl Into<String>) -> Self {
    self.include.push(pattern.into());
    self
  }

  pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
    self.exclude.push(pattern.into());
    self
  }
}

impl Host {
  /// Materialize a host directory as a build-graph directory.
  ///
  /// The directory is uploaded by the synchronization layer under the key
  /// `host:<abs>` and copied onto scratch, so the upload itself is never
  /// referenced by later steps. Identical paths produce identical
  /// definitions.
  pub fn directory(
    &self,
    path: impl AsRef<Path>,
    pipeline: &PipelinePath,
    platform: &Platform,
    filter: &CopyFilter,
  ) -> Result<Directory, HostError> {
    let path = path.as_ref();
    let span = info_span!("host.directory", path = %path.display());
    let _enter = span.enter();

    let abs = self.resolve_path(path)?;
    let abs_str = path_str(&abs)?.to_string();
    let key = upload_key(&abs)?;

    let recorder = self
      .recorder
      .for_pipeline(pipeline)
      .with_group(&format!("host.directory {abs_str}"), true);

    let opts = LocalOptions::new()
      .with_custom_name(format!("upload {abs_str}"))
      .with_shared_key_hint(key.clone())
      .with_unique_id(key)
      .with_include_patterns(filter.include.clone())
      .with_exclude_patterns(filter.exclude.clone());
    let local = State::local(abs_str.clone(), opts);
    let state = State::scratch().copy(&local, "/", "/", Some(format!("copy {abs_str}")));

    let definition = state.marshal(platform)?;
    recorder.record_vertexes(&definition);

    info!(path = %abs_str, vertices = definition.vertices.len(), "materialized host directory");
    Ok(Directory::new(definition, "/", pipeline.clone(), *platform))
  }

  /// Materialize a single host file.
  ///
  /// The file's parent directory is the upload and only the file itself is
  /// copied out of it, to `/file` on scratch.
  pub fn file(&self, path: impl AsRef<Path>, pipeline: &PipelinePath, platform: &Platform) -> Result<File, HostError> {
    let path = path.as_ref();
    let span = info_span!("host.file", path = %path.display());
    let _enter = span.enter();

    let abs = self.resolve_path(path)?;
    let (Some(parent), Some(name)) = (abs.parent(), abs.file_name()) else {
      return Err(HostError::InvalidFilePath {
        path: path.to_path_buf(),
      });
    };
    let abs_str = path_str(&abs)?.to_string();
    let parent_str = path_str(parent)?.to_string();
    let name_str = path_str(Path::new(name))?.to_string();
    let key = upload_key(&abs)?;

    let recorder = self
      .recorder
      .for_pipeline(pipeline)
      .with_group(&format!("host.file {abs_str}"), true);

    let opts = LocalOptions::new()
      .with_custom_name(format!("upload {abs_str}"))
      .with_shared_key_hint(key.clone())
      .with_unique_id(key);
    let local = State::local(parent_str, opts);
    let state = State::scratch().copy(
      &local,
      name_str,
      FILE_OUTPUT_PATH,
      Some(format!("copy {abs_str}")),
    );

    let definition = state.marshal(platform)?;
    recorder.record_vertexes(&definition);

    info!(path = %abs_str, vertices = definition.vertices.len(), "materialized host file");
    Ok(File::new(definition, FILE_OUTPUT_PATH, pipeline.clone(), *platform))
  }
}
