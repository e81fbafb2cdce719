//! Merging schema units into one executable schema.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use thiserror::Error;
use tracing::{debug, info};

use super::registry::{MergedSchema, ResolverRegistry};
use super::types::{FieldResolverSet, ResolverBinding, SchemaUnit};

/// Errors that can occur while merging resolver bindings.
///
/// All of them mean two units disagree on a type; the caller has to rename or
/// restructure one of them. None is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
  /// The same name is bound as an object in one unit and a scalar in another.
  #[error("conflict on type {type_name:?}: object type re-defined")]
  TypeConflict { type_name: String },

  /// Two units resolve the same field of the same object type.
  #[error("conflict on type {type_name:?}: {field:?}: field re-defined")]
  FieldConflict { type_name: String, field: String },

  /// Two units bind the same scalar.
  #[error("conflict on type {type_name:?}: scalar re-defined")]
  ScalarConflict { type_name: String },
}

/// Merge `units` into one schema named `name`.
///
/// Definitions are concatenated in input order. Resolvers are registered unit
/// by unit, and within a unit in type-name order:
///
/// - a type seen for the first time is registered as is
/// - an object type seen again has the new fields added to the existing set;
///   a field both sets resolve is a [`MergeError::FieldConflict`]
/// - a scalar seen again is a [`MergeError::ScalarConflict`]
/// - an object and a scalar under one name is a [`MergeError::TypeConflict`]
///
/// The result depends only on the order of `units`. Dependencies are not
/// followed; order units topologically before calling.
pub fn merge_schemas<I>(name: &str, units: I) -> Result<MergedSchema, MergeError>
where
  I: IntoIterator,
  I::Item: AsRef<SchemaUnit>,
{
  let mut defs = Vec::new();
  let mut builder = RegistryBuilder::default();

  for unit in units {
    let unit = unit.as_ref();
    defs.push(unit.type_defs.clone());
    builder.add_unit(unit)?;
  }

  let registry = builder.freeze();
  info!(
    schema = name,
    units = defs.len(),
    types = registry.len(),
    "merged schema units"
  );

  Ok(MergedSchema::new(name, defs.join("\n"), registry))
}

/// Concatenate the definitions of `units` without looking at their resolvers.
///
/// Used to build a schema for introspection or validation only; the result
/// has an empty registry and merging never fails.
pub fn merge_definitions<I>(name: &str, units: I) -> MergedSchema
where
  I: IntoIterator,
  I::Item: AsRef<SchemaUnit>,
{
  let defs: Vec<String> = units.into_iter().map(|u| u.as_ref().type_defs.clone()).collect();
  MergedSchema::new(name, defs.join("\n"), ResolverRegistry::default())
}

/// Call-local accumulator, frozen into a [`ResolverRegistry`] once every unit
/// has been added.
#[derive(Default)]
struct RegistryBuilder {
  bindings: BTreeMap<String, ResolverBinding>,
}

impl RegistryBuilder {
  fn add_unit(&mut self, unit: &SchemaUnit) -> Result<(), MergeError> {
    for (type_name, binding) in &unit.resolvers {
      debug!(unit = ?unit.name, type_name = %type_name, kind = binding.kind(), "registering resolver");
      self.add_binding(type_name, binding)?;
    }
    Ok(())
  }

  fn add_binding(&mut self, type_name: &str, binding: &ResolverBinding) -> Result<(), MergeError> {
    let existing = match self.bindings.entry(type_name.to_string()) {
      Entry::Vacant(slot) => {
        slot.insert(binding.clone());
        return Ok(());
      }
      Entry::Occupied(slot) => slot.into_mut(),
    };

    match (existing, binding) {
      (ResolverBinding::Fields(existing), ResolverBinding::Fields(incoming)) => {
        extend_fields(type_name, existing, incoming)
      }
      (ResolverBinding::Scalar(_), ResolverBinding::Fields(_))
      | (ResolverBinding::Fields(_), ResolverBinding::Scalar(_)) => Err(MergeError::TypeConflict {
        type_name: type_name.to_string(),
      }),
      (ResolverBinding::Scalar(_), ResolverBinding::Scalar(_)) => Err(MergeError::ScalarConflict {
        type_name: type_name.to_string(),
      }),
    }
  }

  fn freeze(self) -> ResolverRegistry {
    ResolverRegistry::from_bindings(self.bindings)
  }
}

/// Add `incoming`'s fields to `existing`, rejecting any overlap before
/// touching `existing`.
fn extend_fields(
  type_name: &str,
  existing: &mut FieldResolverSet,
  incoming: &FieldResolverSet,
) -> Result<(), MergeError> {
  if let Some(field) = incoming.field_names().find(|f| existing.contains(f)) {
    return Err(MergeError::FieldConflict {
      type_name: type_name.to_string(),
      field: field.to_string(),
    });
  }
  for (field, resolve) in incoming.iter() {
    existing.set_field(field, resolve.clone());
  }
  Ok(())
}
