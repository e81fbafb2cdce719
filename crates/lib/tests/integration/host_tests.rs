use strata_lib::graph::Op;
use strata_lib::host::{CopyFilter, HostError, upload_key};
use strata_lib::pipeline::{Pipeline, PipelinePath};
use tracing_test::traced_test;

use super::common::{TestEnv, platform};

#[test]
fn workdir_and_dot_materialize_identically() {
  let env = TestEnv::new();
  env.write_file("README.md", "hello");
  let root = PipelinePath::root();

  let dot = env
    .host
    .directory(".", &root, &platform(), &CopyFilter::new())
    .unwrap();
  let abs = env
    .host
    .directory(env.workdir(), &root, &platform(), &CopyFilter::new())
    .unwrap();

  assert_eq!(dot.definition, abs.definition);
}

#[test]
fn distinct_paths_get_distinct_keys_and_digests() {
  let env = TestEnv::new();
  env.write_file("a/one.txt", "1");
  env.write_file("b/two.txt", "2");
  let root = PipelinePath::root();

  let a = env.host.directory("a", &root, &platform(), &CopyFilter::new()).unwrap();
  let b = env.host.directory("b", &root, &platform(), &CopyFilter::new()).unwrap();

  assert_ne!(
    upload_key(&env.resolved("a")).unwrap(),
    upload_key(&env.resolved("b")).unwrap()
  );
  assert_ne!(a.digest(), b.digest());
}

#[test]
fn pipeline_does_not_change_digest() {
  let env = TestEnv::new();
  env.write_file("src/lib.rs", "");

  let plain = env
    .host
    .directory("src", &PipelinePath::root(), &platform(), &CopyFilter::new())
    .unwrap();
  let nested = env
    .host
    .directory(
      "src",
      &PipelinePath::root().add(Pipeline::new("release")),
      &platform(),
      &CopyFilter::new(),
    )
    .unwrap();

  assert_eq!(plain.digest(), nested.digest());
  assert_eq!(nested.pipeline.name(), Some("release"));
}

#[test]
fn every_vertex_is_attributed_to_the_call_group() {
  let env = TestEnv::new();
  env.write_file("src/lib.rs", "");
  let pipeline = PipelinePath::root().add(Pipeline::new("build")).add(Pipeline::new("deps"));

  let dir = env
    .host
    .directory("src", &pipeline, &platform(), &CopyFilter::new())
    .unwrap();

  let group_name = format!("host.directory {}", env.resolved("src").display());
  for digest in dir.definition.digests() {
    let groups = env.host.recorder().groups_of(digest);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, group_name);
    assert_eq!(groups[0].id.0, format!("build/deps/{group_name}"));
    assert!(groups[0].weak);
  }

  let build = env
    .host
    .recorder()
    .groups()
    .into_iter()
    .find(|g| g.name == "build")
    .unwrap();
  assert!(!build.weak);
}

#[test]
fn file_lands_at_fixed_path() {
  let env = TestEnv::new();
  env.write_file("config/app.toml", "name = \"x\"");

  let file = env
    .host
    .file("config/app.toml", &PipelinePath::root(), &platform())
    .unwrap();

  assert_eq!(file.file, "/file");
  match &file.definition.vertices[0].op {
    Op::Local(source) => assert_eq!(source.name, env.resolved("config").display().to_string()),
    other => panic!("expected local op, got {other:?}"),
  }
}

#[test]
fn escaping_requests_are_rejected() {
  let env = TestEnv::new();
  let root = PipelinePath::root();

  let dir = env.host.directory("../..", &root, &platform(), &CopyFilter::new());
  let file = env.host.file("../outside.txt", &root, &platform());
  let socket = env.host.socket("../agent.sock");

  assert!(matches!(dir, Err(HostError::EscapesWorkdir { .. })));
  assert!(matches!(file, Err(HostError::EscapesWorkdir { .. })));
  assert!(matches!(socket, Err(HostError::EscapesWorkdir { .. })));
}

#[test]
fn missing_path_reports_symlink_failure() {
  let env = TestEnv::new();

  let err = env
    .host
    .directory("does-not-exist", &PipelinePath::root(), &platform(), &CopyFilter::new())
    .unwrap_err();

  assert!(matches!(err, HostError::Symlinks { .. }));
  assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn disabled_host_refuses_every_access() {
  let env = TestEnv::disabled();
  env.write_file("src/lib.rs", "");
  let root = PipelinePath::root();

  let dir = env.host.directory("src", &root, &platform(), &CopyFilter::new());
  let file = env.host.file("src/lib.rs", &root, &platform());
  let socket = env.host.socket("src");

  for err in [dir.err(), file.err(), socket.err()] {
    let err = err.unwrap();
    assert!(matches!(err, HostError::RwDisabled));
    assert_eq!(err.to_string(), "host directory/file access is disabled");
  }
}

#[cfg(unix)]
#[test]
fn symlinked_directory_is_resolved() {
  let env = TestEnv::new();
  env.write_file("real/data.txt", "x");
  std::os::unix::fs::symlink(env.workdir().join("real"), env.workdir().join("alias")).unwrap();
  let root = PipelinePath::root();

  let via_alias = env.host.directory("alias", &root, &platform(), &CopyFilter::new()).unwrap();
  let direct = env.host.directory("real", &root, &platform(), &CopyFilter::new()).unwrap();

  assert_eq!(via_alias.digest(), direct.digest());
}

#[cfg(unix)]
#[test]
fn socket_path_is_resolved() {
  let env = TestEnv::new();
  let listener = std::os::unix::net::UnixListener::bind(env.workdir().join("agent.sock")).unwrap();

  let socket = env.host.socket("agent.sock").unwrap();

  assert_eq!(socket.host_path(), env.resolved("agent.sock"));
  drop(listener);
}

#[test]
#[traced_test]
fn materialization_is_logged() {
  let env = TestEnv::new();
  env.write_file("src/lib.rs", "");

  env
    .host
    .directory("src", &PipelinePath::root(), &platform(), &CopyFilter::new())
    .unwrap();

  assert!(logs_contain("materialized host directory"));
}
