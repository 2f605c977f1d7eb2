//! Cataloging archives.
//!
//! Each archive goes through two steps. Inspection (open, decode the cover,
//! transcode it, parse the filename) is pure CPU and file I/O and runs on the
//! blocking thread pool. Committing the result to the catalog happens one
//! archive at a time, in traversal order.
//!
//! The primary entry point is [`import`], which streams [`ImportEvent`]s for a
//! whole directory tree. [`import_file`] catalogs a single archive.

pub mod error;
mod file;
mod stream;

pub use self::file::{Import, import_file};
pub use self::stream::{ImportEvent, Summary, import};
