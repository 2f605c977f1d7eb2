//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A value could not be converted to or from its stored representation.
    #[display("invalid cache data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// Sort parameters failed the allow-list check and were never sent to SQLite.
    #[display("invalid sort clause: {_0:?}")]
    InvalidSort(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // SQLITE_BUSY surfaces as a database error.
        matches!(self, Self::Database)
    }
}
