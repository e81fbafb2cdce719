//! Hashing utilities for content-addressed graph vertices.
//!
//! This module provides:
//! - `Digest`: a `sha256:`-prefixed 64-character hash identifying a vertex
//! - `Hashable`: digest of a value's JSON serialization
//! - `digest_bytes()`: arbitrary byte hashing

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::consts::DIGEST_PREFIX;

pub type HashError = serde_json::Error;

/// A content digest identifying a unique graph vertex.
///
/// # Format
///
/// `sha256:` followed by the lowercase hexadecimal SHA-256, e.g.
/// `"sha256:a1b2c3..."`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest(pub String);

impl Digest {
  /// Returns the hex part without the algorithm prefix.
  pub fn hex(&self) -> &str {
    self.0.strip_prefix(DIGEST_PREFIX).unwrap_or(&self.0)
  }
}

impl std::fmt::Display for Digest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Types whose JSON serialization is their identity.
///
/// Implementors must serialize deterministically: ordered maps only, no
/// `HashMap` fields.
pub trait Hashable: Serialize {
  fn compute_digest(&self) -> Result<Digest, HashError> {
    let serialized = serde_json::to_string(self)?;
    Ok(digest_bytes(serialized.as_bytes()))
  }
}

/// Hash arbitrary bytes.
pub fn digest_bytes(data: &[u8]) -> Digest {
  let mut hasher = Sha256::new();
  hasher.update(data);
  Digest(format!("{}{:x}", DIGEST_PREFIX, hasher.finalize()))
}
