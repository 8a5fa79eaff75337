//! Configuration error types.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The merged providers could not be deserialized.
    #[display("failed to load configuration: {_0}")]
    Load(figment::Error),
    /// A value loaded fine but fails validation.
    #[display("invalid configuration value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
    /// The archive root does not point at a usable directory.
    #[display("archive root is not a directory: {}", _0.display())]
    BadArchiveRoot(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Configuration is static per invocation; fix it and rerun.
        false
    }
}
