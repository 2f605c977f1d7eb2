//! Repository for the catalog, the library and reading progress.
//!
//! Comics are write-once: an upsert of an id that is already cataloged is
//! ignored, so re-running an import never changes existing rows (including
//! their `imported_at`). Changing an already cataloged comic's metadata means
//! rebuilding the catalog.

use crate::error::{ErrorKind, Result};
use crate::models::{ComicRow, EntryRow};
use crate::search::Search;
use crate::{CatalogEntry, Comic, Database};
use exn::ResultExt;
use sqlx::SqlitePool;
use tracing::instrument;

const LAST_VISITED_PAGE: &str = "last_visited_page";

/// Query surface over the catalog database.
///
/// A dry-run repository answers reads normally but performs no writes; write
/// operations report what *would* have happened.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
    dry_run: bool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), dry_run: false }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool, dry_run: bool) -> Self {
        Self { pool, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Insert a comic and its encoded cover, unless a comic with the same id
    /// is already cataloged.
    ///
    /// Returns `true` if the comic was inserted, `false` if the id was already
    /// taken (the existing row is left untouched).
    #[instrument(skip_all, fields(id = %comic.id))]
    pub async fn upsert(&self, comic: &Comic, cover: &[u8]) -> Result<bool> {
        let row = ComicRow::try_from(comic)?;
        if self.dry_run {
            return Ok(!self.exists(&row.id).await?);
        }
        let result = sqlx::query(include_str!("../queries/insert_comic.sql"))
            .bind(row.id)
            .bind(row.title)
            .bind(row.artist)
            .bind(row.book)
            .bind(row.source_modified_at)
            .bind(row.imported_at)
            .bind(row.local_path)
            .bind(cover)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        sqlx::query_scalar(include_str!("../queries/comic_exists.sql"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Look up a single comic by its id.
    pub async fn get_by_id(&self, id: impl AsRef<str>) -> Result<Option<CatalogEntry>> {
        let row: Option<EntryRow> = sqlx::query_as(include_str!("../queries/get_by_id.sql"))
            .bind(id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(|r| r.try_into()).transpose()
    }

    /// The encoded cover stored for a comic.
    pub async fn get_cover(&self, id: impl AsRef<str>) -> Result<Option<Vec<u8>>> {
        sqlx::query_scalar(include_str!("../queries/get_cover.sql"))
            .bind(id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Number of comics in the catalog.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_comics.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("count"))
    }

    /// List one page of the catalog.
    ///
    /// Sort parameters that fail the allow-list never reach SQLite: the search
    /// is abandoned with a warning and an empty page is returned. Entries that
    /// compare equal on the sort column come back in whatever order SQLite
    /// produces, which is not guaranteed to be stable between calls.
    #[instrument(skip_all, fields(offset = search.page.offset, limit = search.page.limit))]
    pub async fn search(&self, search: &Search) -> Result<Vec<CatalogEntry>> {
        let order_by = match search.sort.clause() {
            Ok(clause) => clause,
            Err(err) => {
                tracing::warn!(
                    target: "panels::security",
                    security = true,
                    sort_by = %search.sort.field,
                    sort_direction = %search.sort.direction,
                    error = ?err,
                    "rejected search with unsafe sort parameters"
                );
                return Ok(Vec::new());
            },
        };
        let sql = format!("{} ORDER BY {order_by} LIMIT ?3 OFFSET ?4", include_str!("../queries/search.sql"));
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(search.library_only)
            .bind(search.keyword_pattern())
            .bind(i64::from(search.page.limit))
            .bind(i64::from(search.page.offset))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(|r| r.try_into()).collect()
    }

    // =========================================================================
    // Library
    // =========================================================================

    /// Add or remove a comic from the library. Both directions are idempotent,
    /// and bookmarking an id that is not cataloged does nothing.
    #[instrument(skip(self))]
    pub async fn set_bookmark(&self, id: &str, bookmarked: bool) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        let query = match bookmarked {
            true => include_str!("../queries/add_bookmark.sql"),
            false => include_str!("../queries/remove_bookmark.sql"),
        };
        sqlx::query(query).bind(id).execute(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// The last page of results the reader visited. Zero on a fresh catalog.
    pub async fn last_visited_page(&self) -> Result<u32> {
        let value: Option<String> = sqlx::query_scalar(include_str!("../queries/get_attr.sql"))
            .bind(LAST_VISITED_PAGE)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match value {
            Some(value) => value.parse::<u32>().or_raise(|| ErrorKind::InvalidData("last visited page")),
            None => Ok(0),
        }
    }

    /// Move the last visited page forward, but only by exactly one.
    ///
    /// Returns `true` if the stored page changed. Repeats and jumps (in either
    /// direction) are ignored. The check and the write happen in one statement.
    #[instrument(skip(self))]
    pub async fn advance_if_sequential(&self, page: u32) -> Result<bool> {
        if self.dry_run {
            return Ok(self.last_visited_page().await?.checked_add(1) == Some(page));
        }
        let result = sqlx::query(include_str!("../queries/advance_last_visited_page.sql"))
            .bind(i64::from(page))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
