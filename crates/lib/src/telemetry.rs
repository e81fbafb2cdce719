//! Log output setup.

use tracing_subscriber::EnvFilter;

use crate::consts::LOG_ENV;

/// Install a formatted subscriber filtered by `STRATA_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already installed, in which case
/// the existing one is left in place.
pub fn init_tracing() -> bool {
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .try_init()
    .is_ok()
}
