//! Pipeline paths.
//!
//! A pipeline is a named logical operation a caller groups work under
//! ("build frontend", "test suite", ...). Pipelines nest, and the path from the
//! outermost to the innermost one is carried by every graph node so progress
//! can be attributed to it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pipeline {
  pub name: String,
  pub description: Option<String>,
  pub labels: BTreeMap<String, String>,
}

impl Pipeline {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      description: None,
      labels: BTreeMap::new(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.labels.insert(key.into(), value.into());
    self
  }
}

/// Ordered path of nested pipelines, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PipelinePath(Vec<Pipeline>);

impl PipelinePath {
  /// The root path: no enclosing pipeline.
  pub fn root() -> Self {
    Self(Vec::new())
  }

  /// Returns a new path with `pipeline` nested inside this one.
  ///
  /// The receiver is left untouched so sibling pipelines can branch off the
  /// same parent.
  pub fn add(&self, pipeline: Pipeline) -> Self {
    let mut path = self.0.clone();
    path.push(pipeline);
    Self(path)
  }

  /// Name of the innermost pipeline, if any.
  pub fn name(&self) -> Option<&str> {
    self.0.last().map(|p| p.name.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &Pipeline> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for PipelinePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names: Vec<&str> = self.0.iter().map(|p| p.name.as_str()).collect();
    write!(f, "{}", names.join(" / "))
  }
}
