//! Comic archive access.
//!
//! A comic archive is a zip file of page images; the entry at index 0 of the
//! archive's own listing is its cover. Archives are always opened fresh for
//! each operation and never modified in place.
//!
//! All functions here are blocking. Async callers should run them on a
//! blocking thread pool.

mod cover;
mod entries;
pub mod error;
mod path;
mod recompress;
#[cfg(test)]
mod testing;

pub use crate::cover::{Cover, extract_cover};
pub use crate::entries::{list_entries, read_entry};
pub use crate::path::{ARCHIVE_EXTENSION, is_archive};
pub use crate::recompress::{Recompressed, recompress};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

pub(crate) type Archive = ZipArchive<BufReader<File>>;

/// Open an archive for random access.
pub(crate) fn open(path: &Path) -> Result<Archive> {
    let file = File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
    ZipArchive::new(BufReader::new(file)).or_raise(|| ErrorKind::Open(path.to_path_buf()))
}
