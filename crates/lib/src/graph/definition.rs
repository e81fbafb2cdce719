//! Marshalling states into content-addressed definitions.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use super::state::{Op, State, StateNode};
use super::types::GraphError;
use crate::platform::Platform;
use crate::util::hash::{Digest, Hashable};

/// One vertex of a marshalled definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
  pub digest: Digest,
  pub op: Op,
  /// Digests of the input vertices, in op order.
  pub inputs: Vec<Digest>,
  pub platform: Platform,
}

/// Descriptive data attached to a vertex; never part of its digest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VertexMetadata {
  pub custom_name: Option<String>,
}

/// A serialized build graph.
///
/// Vertices are ordered dependencies first. The same state marshalled for the
/// same platform always yields an identical definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
  pub vertices: Vec<Vertex>,
  pub metadata: BTreeMap<Digest, VertexMetadata>,
  /// The vertex the definition evaluates to; `None` for scratch.
  pub output: Option<Digest>,
}

impl Definition {
  pub fn vertex(&self, digest: &Digest) -> Option<&Vertex> {
    self.vertices.iter().find(|v| &v.digest == digest)
  }

  pub fn output_vertex(&self) -> Option<&Vertex> {
    self.output.as_ref().and_then(|d| self.vertex(d))
  }

  pub fn digests(&self) -> impl Iterator<Item = &Digest> {
    self.vertices.iter().map(|v| &v.digest)
  }
}

/// The identity-bearing part of a vertex.
#[derive(Serialize)]
struct VertexKey<'a> {
  op: &'a Op,
  inputs: &'a [Digest],
  platform: &'a Platform,
}

impl Hashable for VertexKey<'_> {}

struct Marshaller<'a> {
  platform: &'a Platform,
  graph: DiGraph<Vertex, ()>,
  indices: HashMap<Digest, NodeIndex>,
  metadata: BTreeMap<Digest, VertexMetadata>,
}

pub(crate) fn marshal(state: &State, platform: &Platform) -> Result<Definition, GraphError> {
  let Some(root) = state.node() else {
    return Ok(Definition::default());
  };

  let mut marshaller = Marshaller {
    platform,
    graph: DiGraph::new(),
    indices: HashMap::new(),
    metadata: BTreeMap::new(),
  };
  let output = marshaller.visit(root)?;

  let order = toposort(&marshaller.graph, None).map_err(|_| GraphError::CycleDetected)?;
  let vertices = order.into_iter().map(|idx| marshaller.graph[idx].clone()).collect();

  Ok(Definition {
    vertices,
    metadata: marshaller.metadata,
    output: Some(output),
  })
}

impl Marshaller<'_> {
  fn visit(&mut self, node: &Arc<StateNode>) -> Result<Digest, GraphError> {
    validate(&node.op)?;

    let mut inputs = Vec::with_capacity(node.inputs.len());
    for input in &node.inputs {
      let child = input.node().ok_or(GraphError::ScratchInput)?;
      inputs.push(self.visit(child)?);
    }

    let digest = VertexKey {
      op: &node.op,
      inputs: &inputs,
      platform: self.platform,
    }
    .compute_digest()?;

    if !self.indices.contains_key(&digest) {
      let idx = self.graph.add_node(Vertex {
        digest: digest.clone(),
        op: node.op.clone(),
        inputs: inputs.clone(),
        platform: *self.platform,
      });
      // Edge from dependency to dependent
      for input in &inputs {
        if let Some(&dep_idx) = self.indices.get(input) {
          self.graph.add_edge(dep_idx, idx, ());
        }
      }
      self.indices.insert(digest.clone(), idx);
    }

    if let Some(name) = &node.custom_name {
      self.metadata.entry(digest.clone()).or_default().custom_name = Some(name.clone());
    }

    Ok(digest)
  }
}

fn validate(op: &Op) -> Result<(), GraphError> {
  match op {
    Op::Local(local) => {
      if local.name.is_empty() || !Path::new(&local.name).is_absolute() {
        return Err(GraphError::InvalidLocalSource {
          name: local.name.clone(),
        });
      }
    }
    Op::Copy(copy) => {
      if copy.src_path.is_empty() || copy.dest_path.is_empty() {
        return Err(GraphError::EmptyCopyPath);
      }
    }
  }
  Ok(())
}
