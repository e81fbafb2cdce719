use std::sync::Arc;

use serde_json::{Value, json};
use strata_lib::schema::{
  FieldResolverSet, MergeError, ResolveContext, ResolverBinding, ScalarResolver, SchemaUnit, merge_schemas,
};

fn core_unit() -> SchemaUnit {
  SchemaUnit::new("type Query { host: Host }\ntype Host { workdir: String }")
    .with_name("core")
    .with_resolver("Query", FieldResolverSet::new().with_field("host", |_| Ok(json!({}))))
    .with_resolver(
      "Host",
      FieldResolverSet::new().with_field("workdir", |_| Ok(json!("/work"))),
    )
}

fn directory_unit(core: Arc<SchemaUnit>) -> SchemaUnit {
  SchemaUnit::new("extend type Host { directory(path: String!): Directory }\nscalar DirectoryID")
    .with_name("directory")
    .with_dependency(core)
    .with_resolver(
      "Host",
      FieldResolverSet::new().with_field("directory", |ctx| {
        let path = ctx.args.get("path").and_then(Value::as_str).unwrap_or(".");
        Ok(json!({ "path": path }))
      }),
    )
    .with_resolver("DirectoryID", ScalarResolver::passthrough())
}

#[test]
fn federated_units_resolve_through_one_registry() {
  let core = Arc::new(core_unit());
  let directory = directory_unit(Arc::clone(&core));

  let schema = merge_schemas("strata", [&*core, &directory]).unwrap();

  assert!(schema.type_defs().starts_with("type Query"));
  assert!(schema.type_defs().contains("extend type Host"));

  let registry = schema.resolvers();
  assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["DirectoryID", "Host", "Query"]);

  let mut ctx = ResolveContext::default();
  ctx.args.insert("path".to_string(), json!("src"));
  assert_eq!(registry.resolve_field("Host", "directory", &ctx).unwrap(), json!({ "path": "src" }));
  assert_eq!(
    registry.resolve_field("Host", "workdir", &ResolveContext::default()).unwrap(),
    json!("/work")
  );
  assert!(matches!(registry.get("DirectoryID"), Some(ResolverBinding::Scalar(_))));
}

#[test]
fn conflicts_are_deterministic() {
  let a = core_unit();
  let b = SchemaUnit::new("").with_resolver(
    "Host",
    FieldResolverSet::new()
      .with_field("workdir", |_| Ok(json!("/elsewhere")))
      .with_field("env", |_| Ok(json!({}))),
  );

  let first = merge_schemas("strata", [&a, &b]).unwrap_err();
  let second = merge_schemas("strata", [&a, &b]).unwrap_err();

  assert_eq!(first, second);
  assert_eq!(
    first,
    MergeError::FieldConflict {
      type_name: "Host".to_string(),
      field: "workdir".to_string(),
    }
  );
}

#[test]
fn order_only_changes_definitions() {
  let core = Arc::new(core_unit());
  let directory = directory_unit(Arc::clone(&core));

  let forward = merge_schemas("strata", [&*core, &directory]).unwrap();
  let reverse = merge_schemas("strata", [&directory, &*core]).unwrap();

  assert_ne!(forward.type_defs(), reverse.type_defs());
  assert_eq!(
    forward.resolvers().type_names().collect::<Vec<_>>(),
    reverse.resolvers().type_names().collect::<Vec<_>>()
  );
}
