//! Exporting build results to the host.
//!
//! An export hands one target to a [`GraphClient`] and mirrors the status
//! stream the client produces. The mirror feeds the host's progress recorder
//! and, when given, a caller-supplied sink. [`Host::export`] does not return
//! until the mirror has drained, so the caller's sink holds every event the
//! client sent by the time the call completes.

mod mirror;

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{Instrument, info, info_span, warn};

pub use mirror::mirror_status;

use crate::host::{Host, HostError};
use crate::progress::SolveStatus;

/// Format a build result is exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exporter {
  /// Files written into a host directory.
  Local,
  /// A tarball written to a host file.
  Tar,
  /// An OCI image tarball.
  Oci,
}

/// One export target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
  pub exporter: Exporter,
  pub attrs: BTreeMap<String, String>,
  /// Host destination. Relative paths are placed under the workdir.
  pub output_dir: Option<PathBuf>,
}

impl ExportEntry {
  pub fn new(exporter: Exporter) -> Self {
    Self {
      exporter,
      attrs: BTreeMap::new(),
      output_dir: None,
    }
  }

  /// Export files into `dir`.
  pub fn local(dir: impl Into<PathBuf>) -> Self {
    Self {
      output_dir: Some(dir.into()),
      ..Self::new(Exporter::Local)
    }
  }

  /// Export a tarball to `path`.
  pub fn tar(path: impl Into<PathBuf>) -> Self {
    Self {
      output_dir: Some(path.into()),
      ..Self::new(Exporter::Tar)
    }
  }

  pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.attrs.insert(key.into(), value.into());
    self
  }
}

/// Options passed to the graph client for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOpts {
  pub exports: Vec<ExportEntry>,
  /// Local sources the synchronization layer may serve, by name.
  pub local_dirs: BTreeMap<String, PathBuf>,
  pub frontend_attrs: BTreeMap<String, String>,
}

/// The execution engine side of an export.
///
/// `build` runs `build_fn` and sends status batches on `status`. The client
/// must drop every clone of `status` by the time the returned future
/// completes; the export waits for the channel to close.
pub trait GraphClient {
  type BuildFn: Send;
  type Error: std::error::Error + Send + Sync + 'static;

  fn build(
    &self,
    opts: SolveOpts,
    build_fn: Self::BuildFn,
    status: UnboundedSender<SolveStatus>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl Host {
  /// Build with `client` and export the result to `target`.
  ///
  /// `opts.exports` is replaced with `target`. Status events go to the host's
  /// progress recorder and, if given, to `status_sink`; all of them have been
  /// forwarded when this returns, whether the build succeeded or not.
  pub async fn export<C: GraphClient>(
    &self,
    mut target: ExportEntry,
    client: &C,
    mut opts: SolveOpts,
    status_sink: Option<UnboundedSender<SolveStatus>>,
    build_fn: C::BuildFn,
  ) -> Result<(), HostError> {
    self.ensure_rw()?;

    if let Some(dest) = &target.output_dir {
      target.output_dir = Some(self.normalize_dest(dest)?);
    }

    let span = info_span!("host.export", exporter = ?target.exporter, dest = ?target.output_dir);
    let (status, mirror) = mirror_status(status_sink, self.recorder().clone());
    opts.exports = vec![target];

    let built = client.build(opts, build_fn, status).instrument(span.clone()).await;
    let mirrored = mirror.await;

    let _enter = span.enter();
    if let Err(err) = &mirrored {
      warn!(error = %err, "status mirror did not finish cleanly");
    }
    built.map_err(|err| HostError::Build(Box::new(err)))?;
    mirrored.map_err(HostError::StatusMirror)?;

    info!("export finished");
    Ok(())
  }
}
