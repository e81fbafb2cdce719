//! Graph operations and the immutable state builder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{Definition, marshal};
use super::types::GraphError;
use crate::platform::Platform;

/// A local directory the synchronization layer uploads from the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalSource {
  /// Absolute host path of the directory to synchronize.
  pub name: String,
  /// Concurrent synchronizations sharing this hint are coalesced.
  pub shared_key_hint: Option<String>,
  /// Pins the vertex identity so identical requests produce identical digests.
  pub unique_id: Option<String>,
  pub include_patterns: Option<Vec<String>>,
  pub exclude_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CopyBase {
  /// Copy into a fresh empty filesystem.
  Scratch,
  /// Copy onto the first input.
  Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyOp {
  pub src_path: String,
  pub dest_path: String,
  pub base: CopyBase,
}

/// A single graph operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
  Local(LocalSource),
  Copy(CopyOp),
}

/// Options for [`State::local`].
#[derive(Debug, Clone, Default)]
pub struct LocalOptions {
  custom_name: Option<String>,
  shared_key_hint: Option<String>,
  unique_id: Option<String>,
  include_patterns: Vec<String>,
  exclude_patterns: Vec<String>,
}

impl LocalOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
    self.custom_name = Some(name.into());
    self
  }

  pub fn with_shared_key_hint(mut self, key: impl Into<String>) -> Self {
    self.shared_key_hint = Some(key.into());
    self
  }

  pub fn with_unique_id(mut self, id: impl Into<String>) -> Self {
    self.unique_id = Some(id.into());
    self
  }

  pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Self {
    self.include_patterns = patterns;
    self
  }

  pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
    self.exclude_patterns = patterns;
    self
  }
}

#[derive(Debug)]
pub(crate) struct StateNode {
  pub op: Op,
  pub inputs: Vec<State>,
  pub custom_name: Option<String>,
}

/// An immutable handle onto a point in a build graph.
///
/// States are cheap to clone and never mutated; every operation returns a new
/// state referring to its inputs. The empty state is `scratch`, an empty
/// filesystem with no vertex of its own.
#[derive(Debug, Clone, Default)]
pub struct State {
  node: Option<Arc<StateNode>>,
}

impl State {
  pub fn scratch() -> Self {
    Self { node: None }
  }

  pub fn is_scratch(&self) -> bool {
    self.node.is_none()
  }

  pub(crate) fn node(&self) -> Option<&Arc<StateNode>> {
    self.node.as_ref()
  }

  /// A host directory synchronized by the external sync layer.
  ///
  /// Empty pattern lists are omitted from the op entirely.
  pub fn local(name: impl Into<String>, opts: LocalOptions) -> Self {
    let non_empty = |patterns: Vec<String>| (!patterns.is_empty()).then_some(patterns);
    let op = Op::Local(LocalSource {
      name: name.into(),
      shared_key_hint: opts.shared_key_hint,
      unique_id: opts.unique_id,
      include_patterns: non_empty(opts.include_patterns),
      exclude_patterns: non_empty(opts.exclude_patterns),
    });
    Self {
      node: Some(Arc::new(StateNode {
        op,
        inputs: Vec::new(),
        custom_name: opts.custom_name,
      })),
    }
  }

  /// Copy `src_path` out of `src` to `dest_path` on top of this state.
  ///
  /// Invalid arguments (scratch source, empty paths) are reported by
  /// [`marshal`](Self::marshal), not here.
  pub fn copy(
    &self,
    src: &State,
    src_path: impl Into<String>,
    dest_path: impl Into<String>,
    custom_name: Option<String>,
  ) -> Self {
    let (base, inputs) = match &self.node {
      None => (CopyBase::Scratch, vec![src.clone()]),
      Some(_) => (CopyBase::Input, vec![self.clone(), src.clone()]),
    };
    Self {
      node: Some(Arc::new(StateNode {
        op: Op::Copy(CopyOp {
          src_path: src_path.into(),
          dest_path: dest_path.into(),
          base,
        }),
        inputs,
        custom_name,
      })),
    }
  }

  /// Serialize the graph reachable from this state into a content-addressed
  /// definition for `platform`.
  pub fn marshal(&self, platform: &Platform) -> Result<Definition, GraphError> {
    marshal(self, platform)
  }
}
