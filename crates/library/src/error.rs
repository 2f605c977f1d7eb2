//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Each operation module has its own
//! error kinds describing where it failed; they surface here wrapped in the
//! kind of the operation that was running.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The collection root does not exist or is not a directory. Nothing was
    /// written; the whole run is aborted.
    #[display("collection root is not a readable directory: {}", _0.display())]
    RootPath(#[error(not(source))] PathBuf),
    /// Part of the directory tree could not be read. The walk carries on.
    #[display("issue walking the collection")]
    Scan,
    /// A single archive could not be cataloged.
    #[display("issue importing archive")]
    Import,
    /// No comic with this id is cataloged.
    #[display("comic not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The catalog could not be queried.
    #[display("issue querying the catalog")]
    Cache,
    /// A cataloged archive could not be read.
    #[display("issue reading archive")]
    Archive,
    /// A single archive could not be recompressed.
    #[display("issue recompressing archive")]
    Recompress,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cache)
    }
}
