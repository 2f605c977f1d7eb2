//! Metadata extraction for comic archives.
//!
//! Comic archives in a collection are conventionally named
//! `[Artist] Title (Book).zip`. This crate pulls those three fields back out of
//! the filename and derives the stable catalog identifier from the title.
//! Nothing here touches the filesystem.

mod consts;
pub mod models;

pub use crate::consts::UNKNOWN;
use crate::models::Metadata;
use regex::Regex;
use rslug::slugify;
use tracing::instrument;

/// Parses `(title, artist, book)` out of an archive's filename.
///
/// Never fails: each field independently falls back when its pattern is absent.
/// The title falls back to the full filename; artist and book fall back to
/// [`UNKNOWN`].
///
/// ```rust
/// use panels_extract::extract;
/// let metadata = extract("[ArtistX] My Comic (Vol 1).zip");
/// assert_eq!(metadata.artist, "ArtistX");
/// assert_eq!(metadata.title, "My Comic");
/// assert_eq!(metadata.book, "Vol 1");
/// ```
#[instrument(level = "trace")]
pub fn extract(filename: &str) -> Metadata {
    Metadata {
        title: capture(&consts::TITLE_REGEX, filename).unwrap_or_else(|| filename.to_string()),
        artist: capture(&consts::ARTIST_REGEX, filename).unwrap_or_else(|| UNKNOWN.to_string()),
        book: capture(&consts::BOOK_REGEX, filename).unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// First capture group of the first match, trimmed. Blank captures count as no match.
fn capture(regex: &Regex, haystack: &str) -> Option<String> {
    regex
        .captures(haystack)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Derives the catalog identifier for a title.
///
/// Titles made up entirely of punctuation slugify to nothing, those get a
/// checksum-based identifier instead so that the id is never empty.
pub fn slug(title: &str) -> String {
    let slug = slugify!(title);
    match slug.is_empty() {
        true => format!("comic-{:08x}", crc32fast::hash(title.as_bytes())),
        false => slug,
    }
}
