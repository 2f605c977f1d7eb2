//! Page and cover access for cataloged comics.
//!
//! The catalog only stores where each archive lives; every call here opens the
//! archive fresh on the blocking thread pool.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use panels_cache::Repository;
use panels_extract::models::Comic;
use tracing::instrument;

async fn locate(cache: &Repository, id: &str) -> Result<Comic> {
    let entry = cache.get_by_id(id).await.or_raise(|| ErrorKind::Cache)?;
    entry.map(|e| e.comic).ok_or_raise(|| ErrorKind::NotFound(id.to_string()))
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> panels_archive::error::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.or_raise(|| ErrorKind::Archive)?.or_raise(|| ErrorKind::Archive)
}

/// Entry names of a comic's archive, in the archive's own order.
#[instrument(skip(cache))]
pub async fn pages(cache: &Repository, id: &str) -> Result<Vec<String>> {
    let comic = locate(cache, id).await?;
    blocking(move || panels_archive::list_entries(&comic.path)).await
}

/// Raw bytes of the entry called exactly `name`, or `None` if the archive has
/// no such entry.
#[instrument(skip(cache))]
pub async fn page(cache: &Repository, id: &str, name: &str) -> Result<Option<Vec<u8>>> {
    let comic = locate(cache, id).await?;
    let name = name.to_string();
    blocking(move || panels_archive::read_entry(&comic.path, &name)).await
}

/// The transcoded cover stored in the catalog.
#[instrument(skip(cache))]
pub async fn cover(cache: &Repository, id: &str) -> Result<Vec<u8>> {
    let cover = cache.get_cover(id).await.or_raise(|| ErrorKind::Cache)?;
    cover.ok_or_raise(|| ErrorKind::NotFound(id.to_string()))
}
