//! Content-addressed build-graph definitions.
//!
//! This is the minimal slice of the graph model the host bridge emits: local
//! sources synchronized from the host, and copies between filesystems. States
//! are built immutably and marshalled into a [`Definition`] whose vertices are
//! keyed by the digest of their op, inputs and platform.
//!
//! # Submodules
//!
//! - `state` - ops and the immutable state builder
//! - `definition` - marshalling into ordered, digest-keyed vertices
//! - `node` - directory, file and socket nodes handed to callers

mod definition;
mod node;
mod state;
mod types;

pub use definition::{Definition, Vertex, VertexMetadata};
pub use node::{Directory, File, HostSocket};
pub use state::{CopyBase, CopyOp, LocalOptions, LocalSource, Op, State};
pub use types::GraphError;
