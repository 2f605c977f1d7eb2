//! Error types for the [`import`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// An import error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of an import failure.
///
/// [`Archive`](Self::Archive) and [`Transcode`](Self::Transcode) are specific
/// to one archive and mean it should be skipped. [`Cache`](Self::Cache) means
/// the catalog itself is unusable.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The archive couldn't be opened, was empty, or its cover wasn't an image.
    Archive,
    /// The cover decoded but couldn't be re-encoded.
    Transcode,
    /// Writing to the [catalog](panels_cache::Repository) failed.
    Cache,
    /// The blocking inspection task panicked or was cancelled.
    Interrupted,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cache)
    }
}
