//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant is scoped to a single archive: the caller should skip that
/// archive and carry on with the next one.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file is missing, unreadable, or not a zip archive.
    #[display("could not open archive: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The archive has no entries, so there is no cover.
    #[display("archive is empty: {}", _0.display())]
    Empty(#[error(not(source))] PathBuf),
    /// An entry's stream is truncated or corrupt.
    #[display("could not read archive entry: {}", _0.display())]
    EntryRead(#[error(not(source))] PathBuf),
    /// The cover entry is not a decodable image.
    #[display("cover is not a decodable image: {}", _0.display())]
    ImageDecode(#[error(not(source))] PathBuf),
    /// Writing a recompressed archive failed.
    #[display("could not write archive: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Open(_) | Self::Write(_))
    }
}
