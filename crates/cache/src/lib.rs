//! SQLite catalog index.
//!
//! This crate holds the persisted catalog built by an import: one row per
//! comic archive (with its cover stored inline), the set of bookmarked comics,
//! and the reader's last visited page. The archives on disk are the source of
//! truth for page content; the catalog is the only authority for metadata.
//!
//! # Architecture
//! - [`Database`] owns the connection pool and runs the embedded migrations on
//!   connect. Connecting to a fresh file is what initializes the catalog.
//! - [`Repository`] is the query surface used by both the importer (writes)
//!   and readers (searches and point lookups).
//! - [`Search`] describes a filtered, sorted, paginated listing. Its sort
//!   clause is the only piece of SQL built from caller input and goes through
//!   a single allow-list check before reaching SQLite.

mod db;
pub mod error;
mod models;
mod repo;
mod search;

pub use crate::db::Database;
pub use crate::models::CatalogEntry;
pub use crate::repo::Repository;
pub use crate::search::{DEFAULT_PAGE_SIZE, Page, Search, Sort};
use panels_extract::models::Comic;
