//! Discovery of candidate archives.
//!
//! Traversal is kept free of side effects so it can be driven (and tested) on
//! its own; [`import`](crate::import) and [`recompress`](crate::recompress)
//! decide what to do with each path.

mod stream;

pub use self::stream::{archives, check_root};
