//! Lexical path confinement.
//!
//! Nothing here touches the filesystem. Symlinks are resolved separately by
//! [`Host::resolve_path`](super::Host::resolve_path), after confinement, and
//! the resolved target is not checked again.

use std::path::{Component, Path, PathBuf};

use super::types::HostError;
use crate::consts::UPLOAD_KEY_PREFIX;

/// Lexically normalize `path`: drop `.` components and fold `..` into the
/// preceding component.
///
/// `..` directly below the root is dropped. Leading `..` components of a
/// relative path are kept. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
  let mut out: Vec<Component<'_>> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.last() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => out.push(component),
      },
      other => out.push(other),
    }
  }

  if out.is_empty() {
    return PathBuf::from(".");
  }
  out.iter().collect()
}

/// Resolve `requested` against `workdir`.
///
/// An absolute `requested` is returned unchanged: callers asking for an
/// absolute path are trusted with it. A relative one is joined onto `workdir`
/// and cleaned, and must land on `workdir` or below it. The check is
/// component-wise, so `/work` does not contain `/workshop`.
pub fn confine(workdir: &Path, requested: &Path) -> Result<PathBuf, HostError> {
  if requested.is_absolute() {
    return Ok(requested.to_path_buf());
  }

  let root = clean_path(workdir);
  let confined = clean_path(&root.join(requested));
  if !confined.starts_with(&root) {
    return Err(HostError::EscapesWorkdir {
      path: requested.to_path_buf(),
    });
  }
  Ok(confined)
}

/// Key the synchronization layer coalesces and caches uploads of `path` by.
///
/// Distinct paths always get distinct keys, so paths that are not valid
/// UTF-8 are rejected rather than converted lossily.
pub fn upload_key(path: &Path) -> Result<String, HostError> {
  Ok(format!("{UPLOAD_KEY_PREFIX}{}", path_str(path)?))
}

/// `path` as UTF-8 text, without replacement characters.
pub(crate) fn path_str(path: &Path) -> Result<&str, HostError> {
  path.to_str().ok_or_else(|| HostError::NonUtf8Path {
    path: path.to_path_buf(),
  })
}
