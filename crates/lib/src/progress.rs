//! Progress recording and observability groups.
//!
//! A single host call can emit several graph vertices (an upload, a copy, ...).
//! The recorder lets the call open a named group and attribute every vertex of
//! its definition to that group, so status updates coming back from the
//! execution engine can be shown as one logical unit.
//!
//! Groups nest: a recorder scoped to a pipeline path opens one group per
//! pipeline, and host calls open their own group below it. Groups are keyed by
//! their full path, so asking for the same group twice yields the same group.
//!
//! # Weak groups
//!
//! A weak group only exists to label vertices; it is never considered started
//! or finished on its own. Host calls open weak groups because their vertices
//! may be deduplicated into someone else's build and never run under them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::Definition;
use crate::pipeline::PipelinePath;
use crate::util::hash::Digest;

/// Status of one vertex as reported by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VertexStatus {
  pub digest: Digest,
  pub name: Option<String>,
  pub started: bool,
  pub completed: bool,
  pub cached: bool,
  pub error: Option<String>,
}

/// A chunk of log output produced by a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexLog {
  pub digest: Digest,
  pub data: Vec<u8>,
}

/// A batch of status updates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolveStatus {
  pub vertexes: Vec<VertexStatus>,
  pub logs: Vec<VertexLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl std::fmt::Display for GroupId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
  pub id: GroupId,
  pub name: String,
  pub parent: Option<GroupId>,
  pub weak: bool,
}

/// Accumulated progress of one vertex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexProgress {
  pub name: Option<String>,
  pub started: bool,
  pub completed: bool,
  pub cached: bool,
  pub error: Option<String>,
  pub log_bytes: usize,
}

#[derive(Debug, Default)]
struct RecorderState {
  groups: BTreeMap<GroupId, Group>,
  memberships: HashMap<Digest, BTreeSet<GroupId>>,
  vertices: HashMap<Digest, VertexProgress>,
}

/// Handle onto a shared progress state, scoped to one group.
///
/// Cloning is cheap; all clones and all scoped children share the same state.
#[derive(Debug, Clone, Default)]
pub struct ProgressRecorder {
  state: Arc<Mutex<RecorderState>>,
  group: Option<GroupId>,
}

impl ProgressRecorder {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, RecorderState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// The group vertices recorded through this handle are attributed to.
  pub fn current_group(&self) -> Option<&GroupId> {
    self.group.as_ref()
  }

  /// Open (or reuse) a child group and return a handle scoped to it.
  ///
  /// Reopening an existing group strongly makes it strong; a weak request
  /// never downgrades a strong group.
  pub fn with_group(&self, name: &str, weak: bool) -> Self {
    let id = match &self.group {
      Some(parent) => GroupId(format!("{}/{}", parent.0, name)),
      None => GroupId(name.to_string()),
    };

    let mut state = self.lock();
    let group = state.groups.entry(id.clone()).or_insert_with(|| Group {
      id: id.clone(),
      name: name.to_string(),
      parent: self.group.clone(),
      weak,
    });
    group.weak &= weak;
    drop(state);

    debug!(group = %id, weak, "opened progress group");

    Self {
      state: Arc::clone(&self.state),
      group: Some(id),
    }
  }

  /// Return a handle scoped to the innermost pipeline of `pipeline`.
  pub fn for_pipeline(&self, pipeline: &PipelinePath) -> Self {
    pipeline
      .iter()
      .fold(self.clone(), |recorder, p| recorder.with_group(&p.name, false))
  }

  /// Attribute every vertex of `definition` to the current group.
  ///
  /// Custom vertex names from the definition's metadata are kept so status
  /// updates without a name can still be displayed.
  pub fn record_vertexes(&self, definition: &Definition) {
    let mut state = self.lock();
    for vertex in &definition.vertices {
      if let Some(group) = &self.group {
        state
          .memberships
          .entry(vertex.digest.clone())
          .or_default()
          .insert(group.clone());
      }
      let name = definition
        .metadata
        .get(&vertex.digest)
        .and_then(|m| m.custom_name.clone());
      let progress = state.vertices.entry(vertex.digest.clone()).or_default();
      if progress.name.is_none() {
        progress.name = name;
      }
    }
  }

  /// Fold a status batch into the recorded vertex progress.
  pub fn observe(&self, status: &SolveStatus) {
    let mut state = self.lock();
    for vertex in &status.vertexes {
      let progress = state.vertices.entry(vertex.digest.clone()).or_default();
      if vertex.name.is_some() {
        progress.name = vertex.name.clone();
      }
      progress.started |= vertex.started;
      progress.completed |= vertex.completed;
      progress.cached |= vertex.cached;
      if let Some(error) = &vertex.error {
        progress.error = Some(error.clone());
      }

      let groups = state.memberships.get(&vertex.digest);
      if let Some(error) = &vertex.error {
        warn!(vertex = %vertex.digest, groups = ?groups, error = %error, "vertex failed");
      } else {
        debug!(
          vertex = %vertex.digest,
          groups = ?groups,
          completed = vertex.completed,
          cached = vertex.cached,
          "vertex status"
        );
      }
    }
    for log in &status.logs {
      state.vertices.entry(log.digest.clone()).or_default().log_bytes += log.data.len();
    }
  }

  pub fn group(&self, id: &GroupId) -> Option<Group> {
    self.lock().groups.get(id).cloned()
  }

  /// All groups, ordered by id.
  pub fn groups(&self) -> Vec<Group> {
    self.lock().groups.values().cloned().collect()
  }

  /// Groups `digest` has been attributed to, ordered by id.
  pub fn groups_of(&self, digest: &Digest) -> Vec<Group> {
    let state = self.lock();
    state
      .memberships
      .get(digest)
      .map(|ids| ids.iter().filter_map(|id| state.groups.get(id).cloned()).collect())
      .unwrap_or_default()
  }

  /// Vertices attributed to `id`, ordered by digest.
  pub fn vertices_in(&self, id: &GroupId) -> Vec<Digest> {
    let state = self.lock();
    let mut digests: Vec<Digest> = state
      .memberships
      .iter()
      .filter(|(_, groups)| groups.contains(id))
      .map(|(digest, _)| digest.clone())
      .collect();
    digests.sort();
    digests
  }

  pub fn vertex(&self, digest: &Digest) -> Option<VertexProgress> {
    self.lock().vertices.get(digest).cloned()
  }
}
