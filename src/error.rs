//! Command-line Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("invalid command-line arguments")]
    Usage,
    #[display("catalog unavailable")]
    Catalog,
    #[display("library operation failed")]
    Library,
    #[display("comic not found: {_0}")]
    NotFound(#[error(not(source))] String),
    #[display("entry {_1:?} not found in comic {_0}")]
    EntryNotFound(#[error(not(source))] String, #[error(not(source))] String),
    #[display("could not write output: {}", _0.display())]
    Output(#[error(not(source))] PathBuf),
}
