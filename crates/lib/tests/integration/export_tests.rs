use std::future::Future;
use std::time::Duration;

use strata_lib::export::{ExportEntry, GraphClient, SolveOpts};
use strata_lib::host::HostError;
use strata_lib::progress::{SolveStatus, VertexLog, VertexStatus};
use strata_lib::util::hash::Digest;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use super::common::TestEnv;

/// Hands a clone of the status sender to a detached task that reports after
/// the build itself has returned.
struct DetachedReporter {
  fail: bool,
}

impl GraphClient for DetachedReporter {
  type BuildFn = usize;
  type Error = std::io::Error;

  fn build(
    &self,
    _opts: SolveOpts,
    events: Self::BuildFn,
    status: UnboundedSender<SolveStatus>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send {
    let fail = self.fail;
    async move {
      let late = status.clone();
      tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        for n in 0..events {
          let _ = late.send(progress(n));
        }
        let _ = late.send(sentinel());
      });
      drop(status);
      if fail {
        return Err(std::io::Error::other("exporter crashed"));
      }
      Ok(())
    }
  }
}

fn digest(n: usize) -> Digest {
  Digest(format!("sha256:{n:064x}"))
}

fn progress(n: usize) -> SolveStatus {
  SolveStatus {
    vertexes: vec![VertexStatus {
      digest: digest(n),
      started: true,
      completed: true,
      ..Default::default()
    }],
    logs: vec![VertexLog {
      digest: digest(n),
      data: b"ok\n".to_vec(),
    }],
  }
}

fn sentinel() -> SolveStatus {
  SolveStatus {
    vertexes: vec![VertexStatus {
      digest: Digest("sha256:done".to_string()),
      name: Some("done".to_string()),
      ..Default::default()
    }],
    logs: vec![],
  }
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SolveStatus>) -> Vec<SolveStatus> {
  let mut events = Vec::new();
  while let Ok(event) = rx.try_recv() {
    events.push(event);
  }
  events
}

#[tokio::test]
async fn sentinel_is_visible_once_export_returns() {
  let env = TestEnv::new();
  let (sink, mut rx) = unbounded_channel();

  env
    .host
    .export(
      ExportEntry::local("dist"),
      &DetachedReporter { fail: false },
      SolveOpts::default(),
      Some(sink),
      5,
    )
    .await
    .unwrap();

  let events = drain(&mut rx);
  assert_eq!(events.len(), 6);
  assert_eq!(events.last(), Some(&sentinel()));

  let recorded = env.host.recorder().vertex(&digest(4)).unwrap();
  assert!(recorded.completed);
  assert_eq!(recorded.log_bytes, 3);
}

#[tokio::test]
async fn sentinel_is_visible_after_failed_export() {
  let env = TestEnv::new();
  let (sink, mut rx) = unbounded_channel();

  let err = env
    .host
    .export(
      ExportEntry::local("dist"),
      &DetachedReporter { fail: true },
      SolveOpts::default(),
      Some(sink),
      2,
    )
    .await
    .unwrap_err();

  assert!(matches!(err, HostError::Build(_)));
  assert!(err.to_string().contains("exporter crashed"));
  assert_eq!(drain(&mut rx).last(), Some(&sentinel()));
}

#[tokio::test]
async fn disabled_host_refuses_export() {
  let env = TestEnv::disabled();
  let (sink, mut rx) = unbounded_channel();

  let err = env
    .host
    .export(
      ExportEntry::local("dist"),
      &DetachedReporter { fail: false },
      SolveOpts::default(),
      Some(sink),
      1,
    )
    .await
    .unwrap_err();

  assert!(matches!(err, HostError::RwDisabled));
  assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn export_without_sink_still_records_progress() {
  let env = TestEnv::new();

  env
    .host
    .export(
      ExportEntry::local("dist"),
      &DetachedReporter { fail: false },
      SolveOpts::default(),
      None,
      1,
    )
    .await
    .unwrap();

  assert!(env.host.recorder().vertex(&Digest("sha256:done".to_string())).is_some());
}
