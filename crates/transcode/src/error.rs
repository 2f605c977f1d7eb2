//! Transcoding Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A transcoding error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transcoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The encoder rejected the image. Don't retry with the same input; skip it.
    #[display("image could not be encoded: {_0}")]
    Encode(#[error(not(source))] String),
    /// The requested encoding is not recognised.
    #[display("unsupported encoding: {_0}")]
    UnsupportedEncoding(#[error(not(source))] String),
    /// Lossy quality must be within `0..=100`.
    #[display("invalid quality: {_0}")]
    InvalidQuality(#[error(not(source))] u8),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Encoding is deterministic, the same input always fails the same way.
        false
    }
}
