//! Schema federation.
//!
//! Independently authored schema units each contribute definition text and
//! resolvers. [`merge_schemas`] folds them into one [`MergedSchema`] that an
//! external query server can execute, rejecting any redefinition that would
//! make the result depend on which unit "wins".
//!
//! Object types are extensible across units (fields union), scalars are not.

mod merge;
mod registry;
mod types;

pub use merge::{MergeError, merge_definitions, merge_schemas};
pub use registry::{MergedSchema, ResolverRegistry};
pub use types::*;
