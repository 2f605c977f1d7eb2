mod comic;

pub use self::comic::CatalogEntry;
pub(crate) use self::comic::{ComicRow, EntryRow};
