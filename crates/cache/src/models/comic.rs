use crate::Comic;
use crate::error::{Error, ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use panels_extract::models::Metadata;
use std::path::PathBuf;
use time::UtcDateTime;

/// A comic as listed by the catalog, along with whether it is bookmarked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub comic: Comic,
    pub bookmarked: bool,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ComicRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) book: String,
    pub(crate) source_modified_at: i64,
    pub(crate) imported_at: i64,
    pub(crate) local_path: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct EntryRow {
    #[sqlx(flatten)]
    pub(crate) comic: ComicRow,
    pub(crate) bookmarked: bool,
}

fn to_millis(datetime: UtcDateTime, field: &'static str) -> Result<i64> {
    i64::try_from(datetime.unix_timestamp_nanos() / 1_000_000).or_raise(|| ErrorKind::InvalidData(field))
}

fn from_millis(millis: i64, field: &'static str) -> Result<UtcDateTime> {
    UtcDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).or_raise(|| ErrorKind::InvalidData(field))
}

impl TryFrom<&Comic> for ComicRow {
    type Error = Error;
    fn try_from(comic: &Comic) -> Result<Self> {
        Ok(Self {
            id: comic.id.clone(),
            title: comic.metadata.title.clone(),
            artist: comic.metadata.artist.clone(),
            book: comic.metadata.book.clone(),
            source_modified_at: to_millis(comic.modified_at, "source modification date")?,
            imported_at: to_millis(comic.imported_at, "import date")?,
            local_path: comic.path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string(),
        })
    }
}
impl TryFrom<ComicRow> for Comic {
    type Error = Error;
    fn try_from(row: ComicRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            metadata: Metadata {
                title: row.title,
                artist: row.artist,
                book: row.book,
            },
            modified_at: from_millis(row.source_modified_at, "source modification date")?,
            imported_at: from_millis(row.imported_at, "import date")?,
            path: PathBuf::from(row.local_path),
        })
    }
}
impl TryFrom<EntryRow> for CatalogEntry {
    type Error = Error;
    fn try_from(row: EntryRow) -> Result<Self> {
        Ok(Self {
            comic: Comic::try_from(row.comic)?,
            bookmarked: row.bookmarked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row() -> ComicRow {
        ComicRow {
            id: "my-comic".to_string(),
            title: "My Comic".to_string(),
            artist: "ArtistX".to_string(),
            book: "Vol 1".to_string(),
            source_modified_at: 1_589_711_400_123,
            imported_at: 1_700_000_000_000,
            local_path: "/comics/[ArtistX] My Comic (Vol 1).zip".to_string(),
        }
    }

    #[test]
    fn test_row_to_model() {
        let comic = Comic::try_from(make_row()).unwrap();
        assert_eq!(comic.metadata.artist, "ArtistX");
        assert_eq!(comic.path, PathBuf::from("/comics/[ArtistX] My Comic (Vol 1).zip"));
        // Millisecond precision is kept.
        assert_eq!(comic.modified_at.millisecond(), 123);
    }

    #[test]
    fn test_model_to_row_keeps_milliseconds() {
        let comic = Comic::try_from(make_row()).unwrap();
        let row = ComicRow::try_from(&comic).unwrap();
        assert_eq!(row.source_modified_at, 1_589_711_400_123);
        assert_eq!(row.imported_at, 1_700_000_000_000);
    }

    #[test]
    fn test_model_to_row_drops_sub_millisecond_precision() {
        let mut comic = Comic::try_from(make_row()).unwrap();
        comic.modified_at = UtcDateTime::from_unix_timestamp_nanos(1_000_999_999).unwrap();
        assert_eq!(ComicRow::try_from(&comic).unwrap().source_modified_at, 1_000);
    }
}
