//! The merged resolver registry.

use std::collections::BTreeMap;

use serde_json::Value;

use super::types::{ResolveContext, ResolveError, ResolverBinding};

/// Immutable mapping from type name to resolver binding.
///
/// Produced by merging; there is no way to mutate a registry after the merge
/// that built it returns.
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
  bindings: BTreeMap<String, ResolverBinding>,
}

impl ResolverRegistry {
  pub(crate) fn from_bindings(bindings: BTreeMap<String, ResolverBinding>) -> Self {
    Self { bindings }
  }

  pub fn get(&self, type_name: &str) -> Option<&ResolverBinding> {
    self.bindings.get(type_name)
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.bindings.contains_key(type_name)
  }

  /// Registered type names in lexicographic order.
  pub fn type_names(&self) -> impl Iterator<Item = &str> {
    self.bindings.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolverBinding)> {
    self.bindings.iter().map(|(name, b)| (name.as_str(), b))
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// Invoke the resolver for `type_name.field`.
  pub fn resolve_field(&self, type_name: &str, field: &str, ctx: &ResolveContext) -> Result<Value, ResolveError> {
    match self.binding(type_name)? {
      ResolverBinding::Fields(set) => {
        let resolve = set.field(field).ok_or_else(|| ResolveError::UnknownField {
          type_name: type_name.to_string(),
          field: field.to_string(),
        })?;
        resolve(ctx)
      }
      other => Err(mismatch(type_name, "an object", other)),
    }
  }

  pub fn serialize_scalar(&self, type_name: &str, value: &Value) -> Result<Value, ResolveError> {
    match self.binding(type_name)? {
      ResolverBinding::Scalar(scalar) => scalar.serialize(value),
      other => Err(mismatch(type_name, "a scalar", other)),
    }
  }

  pub fn parse_scalar(&self, type_name: &str, value: &Value) -> Result<Value, ResolveError> {
    match self.binding(type_name)? {
      ResolverBinding::Scalar(scalar) => scalar.parse_value(value),
      other => Err(mismatch(type_name, "a scalar", other)),
    }
  }

  fn binding(&self, type_name: &str) -> Result<&ResolverBinding, ResolveError> {
    self
      .bindings
      .get(type_name)
      .ok_or_else(|| ResolveError::UnknownType(type_name.to_string()))
  }
}

fn mismatch(type_name: &str, expected: &'static str, actual: &ResolverBinding) -> ResolveError {
  ResolveError::KindMismatch {
    type_name: type_name.to_string(),
    expected,
    actual: actual.kind(),
  }
}

/// A federated schema: concatenated definitions plus merged resolvers.
#[derive(Debug, Clone)]
pub struct MergedSchema {
  name: String,
  type_defs: String,
  resolvers: ResolverRegistry,
}

impl MergedSchema {
  pub(crate) fn new(name: impl Into<String>, type_defs: String, resolvers: ResolverRegistry) -> Self {
    Self {
      name: name.into(),
      type_defs,
      resolvers,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Every unit's definitions, in input order, joined by newlines.
  pub fn type_defs(&self) -> &str {
    &self.type_defs
  }

  pub fn resolvers(&self) -> &ResolverRegistry {
    &self.resolvers
  }
}
