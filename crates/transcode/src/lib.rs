//! Cover transcoding.
//!
//! Covers are decoded from whatever format the archive stores them in and
//! re-encoded to WebP before being stored inline in the catalog. The
//! [`Encoding`] is a catalog-wide choice: every cover goes through the same
//! lossy (or lossless) encoder so that the transformation is deterministic.

pub mod cli;
mod construct;
pub mod error;
mod ops;

/// Quality used by [`Encoding::default`].
pub const DEFAULT_QUALITY: u8 = 75;
/// Largest width or height the WebP format can represent.
pub const MAX_DIMENSION: u32 = 16383;

/// How covers (and recompressed pages) are encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Lossy WebP at the given quality (`0..=100`).
    Lossy { quality: u8 },
    /// Lossless WebP.
    Lossless,
}
impl Default for Encoding {
    fn default() -> Self {
        Self::Lossy { quality: DEFAULT_QUALITY }
    }
}
