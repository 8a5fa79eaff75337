//! Ingestion Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Note that almost nothing in this crate is allowed to *escalate* an error:
//! the batch contract (one bad file or record never sinks the rest) means
//! these kinds mostly end up in log lines rather than in return values.

use derive_more::{Display, Error};

/// An ingestion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source file could not be parsed, even after the repair pass.
    #[display("unparseable source file: {_0}")]
    SourceParse(#[error(not(source))] String),
    /// The source file parsed, but the top level is not an array of records.
    #[display("source file {_0} is not a record array")]
    NotARecordArray(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A broken export file stays broken. The repair pass already ran.
        false
    }
}
