//! Session Error Types
//!
//! Per-record, per-file and per-media failures never surface here; they
//! degrade in place (skipped file, minimal post, remote-only media). These
//! kinds cover the infrastructure-level failures a caller can act on.

use derive_more::{Display, Error};
use shoebox_archive::error::Error as ArchiveError;

/// A session error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The underlying archive store failed.
    #[display("archive error: {_0}")]
    Archive(#[error(not(source))] String),
    /// Neither the storage-location hint nor the blog name yields a usable
    /// folder name, so the blog's files cannot be located.
    #[display("blog `{_0}` has no resolvable storage folder")]
    NoBlogFolder(#[error(not(source))] String),
}

impl ErrorKind {
    /// Convert an archive error into a session error, preserving the
    /// archive crate's `Exn` frame as a child in its own error tree.
    #[track_caller]
    pub fn archive(err: ArchiveError) -> Error {
        let summary = err.to_string();
        err.raise(ErrorKind::Archive(summary))
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Archive(_))
    }
}
