//! Crate-wide constants.

/// Prefix of every local upload key handed to the synchronization layer.
pub const UPLOAD_KEY_PREFIX: &str = "host:";

/// Fixed path a single host file is copied to inside its output node.
pub const FILE_OUTPUT_PATH: &str = "/file";

/// Prefix of every vertex digest.
pub const DIGEST_PREFIX: &str = "sha256:";

/// Environment variable holding the host workdir.
pub const WORKDIR_ENV: &str = "STRATA_WORKDIR";

/// Environment variable disabling host reads and writes.
pub const DISABLE_RW_ENV: &str = "STRATA_DISABLE_HOST_RW";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "STRATA_LOG";
