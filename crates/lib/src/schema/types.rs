use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

/// Inputs to a field resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveContext {
  /// The value of the object the field is resolved on.
  pub parent: Value,
  /// Field arguments.
  pub args: Map<String, Value>,
}

/// Errors raised while invoking resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  #[error("no resolver registered for type {0:?}")]
  UnknownType(String),

  #[error("type {type_name:?} has no resolver for field {field:?}")]
  UnknownField { type_name: String, field: String },

  #[error("type {type_name:?} is {actual}, expected {expected}")]
  KindMismatch {
    type_name: String,
    expected: &'static str,
    actual: &'static str,
  },

  #[error("{0}")]
  Failed(String),
}

pub type FieldFn = Arc<dyn Fn(&ResolveContext) -> Result<Value, ResolveError> + Send + Sync>;
pub type ScalarFn = Arc<dyn Fn(&Value) -> Result<Value, ResolveError> + Send + Sync>;

/// Per-field resolvers backing one object type.
///
/// Sets are extensible: merging two units that both resolve fields of the same
/// object type unions their fields.
#[derive(Clone, Default)]
pub struct FieldResolverSet {
  fields: BTreeMap<String, FieldFn>,
}

impl FieldResolverSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_field<F>(mut self, name: impl Into<String>, resolve: F) -> Self
  where
    F: Fn(&ResolveContext) -> Result<Value, ResolveError> + Send + Sync + 'static,
  {
    self.fields.insert(name.into(), Arc::new(resolve));
    self
  }

  pub fn set_field(&mut self, name: impl Into<String>, resolve: FieldFn) {
    self.fields.insert(name.into(), resolve);
  }

  pub fn field(&self, name: &str) -> Option<&FieldFn> {
    self.fields.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.fields.contains_key(name)
  }

  /// Field names in lexicographic order.
  pub fn field_names(&self) -> impl Iterator<Item = &str> {
    self.fields.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldFn)> {
    self.fields.iter().map(|(name, f)| (name.as_str(), f))
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

impl fmt::Debug for FieldResolverSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.fields.keys()).finish()
  }
}

/// The atomic resolver backing one scalar type. Never merged.
#[derive(Clone)]
pub struct ScalarResolver {
  serialize: ScalarFn,
  parse_value: ScalarFn,
}

impl ScalarResolver {
  pub fn new<S, P>(serialize: S, parse_value: P) -> Self
  where
    S: Fn(&Value) -> Result<Value, ResolveError> + Send + Sync + 'static,
    P: Fn(&Value) -> Result<Value, ResolveError> + Send + Sync + 'static,
  {
    Self {
      serialize: Arc::new(serialize),
      parse_value: Arc::new(parse_value),
    }
  }

  /// A scalar whose wire and internal representation are the same.
  pub fn passthrough() -> Self {
    Self::new(|v| Ok(v.clone()), |v| Ok(v.clone()))
  }

  /// Internal value to wire value.
  pub fn serialize(&self, value: &Value) -> Result<Value, ResolveError> {
    (self.serialize)(value)
  }

  /// Wire value to internal value.
  pub fn parse_value(&self, value: &Value) -> Result<Value, ResolveError> {
    (self.parse_value)(value)
  }
}

impl fmt::Debug for ScalarResolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ScalarResolver")
  }
}

/// How one type name is resolved.
#[derive(Debug, Clone)]
pub enum ResolverBinding {
  Fields(FieldResolverSet),
  Scalar(ScalarResolver),
}

impl ResolverBinding {
  /// Human-readable kind, used in error messages.
  pub fn kind(&self) -> &'static str {
    match self {
      ResolverBinding::Fields(_) => "an object",
      ResolverBinding::Scalar(_) => "a scalar",
    }
  }
}

impl From<FieldResolverSet> for ResolverBinding {
  fn from(set: FieldResolverSet) -> Self {
    ResolverBinding::Fields(set)
  }
}

impl From<ScalarResolver> for ResolverBinding {
  fn from(scalar: ScalarResolver) -> Self {
    ResolverBinding::Scalar(scalar)
  }
}

/// One source's contribution to a federated schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaUnit {
  pub name: Option<String>,
  /// Schema definition text. Opaque here: never parsed or deduplicated.
  pub type_defs: String,
  pub resolvers: BTreeMap<String, ResolverBinding>,
  /// Units this one builds on. Carried for the caller; merging ignores them.
  pub dependencies: Vec<Arc<SchemaUnit>>,
}

impl SchemaUnit {
  pub fn new(type_defs: impl Into<String>) -> Self {
    Self {
      type_defs: type_defs.into(),
      ..Default::default()
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn with_resolver(mut self, type_name: impl Into<String>, binding: impl Into<ResolverBinding>) -> Self {
    self.resolvers.insert(type_name.into(), binding.into());
    self
  }

  pub fn with_dependency(mut self, unit: Arc<SchemaUnit>) -> Self {
    self.dependencies.push(unit);
    self
  }
}

impl AsRef<SchemaUnit> for SchemaUnit {
  fn as_ref(&self) -> &SchemaUnit {
    self
  }
}
