//! Catalog building and reading for a comic archive collection.
//!
//! - [`scan`] lazily walks a directory tree for candidate archives.
//! - [`import`] turns those archives into catalog entries (cover extracted and
//!   transcoded, metadata parsed from the filename) and streams progress.
//! - [`reader`] resolves catalog ids back to archives for page access.
//! - [`recompress`] writes copies of archives with every page re-encoded.

pub mod error;
pub mod import;
pub mod reader;
pub mod recompress;
pub mod scan;
#[cfg(test)]
mod testing;

use panels_transcode::Encoding;

/// Archives inspected and transcoded at the same time unless told otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Settings shared by the long-running library operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Encoding applied to every cover (and recompressed page).
    pub encoding: Encoding,
    /// Archives processed in parallel; always at least one.
    pub concurrency: usize,
}
impl Default for Context {
    fn default() -> Self {
        Self { encoding: Encoding::default(), concurrency: DEFAULT_CONCURRENCY }
    }
}
impl Context {
    pub fn new(encoding: Encoding, concurrency: usize) -> Self {
        Self { encoding, concurrency: concurrency.max(1) }
    }
}
