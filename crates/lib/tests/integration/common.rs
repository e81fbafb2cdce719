//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

use strata_lib::config::HostConfig;
use strata_lib::host::Host;
use strata_lib::platform::Platform;
use strata_lib::platform::arch::Arch;
use strata_lib::platform::os::Os;
use tempfile::TempDir;

/// Isolated workdir with a host rooted at it.
pub struct TestEnv {
  pub temp: TempDir,
  pub host: Host,
}

impl TestEnv {
  pub fn new() -> Self {
    Self::with_rw(true)
  }

  /// A host whose read/write access is switched off.
  pub fn disabled() -> Self {
    Self::with_rw(false)
  }

  fn with_rw(rw: bool) -> Self {
    let temp = TempDir::new().unwrap();
    let host = Host::new(HostConfig::new(temp.path(), !rw).unwrap());
    Self { temp, host }
  }

  pub fn workdir(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the workdir, creating parents.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Symlink-resolved absolute path of `relative_path`.
  pub fn resolved(&self, relative_path: &str) -> PathBuf {
    dunce::canonicalize(self.temp.path().join(relative_path)).unwrap()
  }
}

pub fn platform() -> Platform {
  Platform::new(Arch::Aarch64, Os::Linux)
}
