use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::import::error::{ErrorKind, Result as ImportResult};
use exn::ResultExt;
use panels_archive::extract_cover;
use panels_cache::Repository;
use panels_extract::extract;
use panels_extract::models::Comic;
use panels_transcode::Encoding;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Outcome of cataloging one archive.
#[derive(Debug)]
pub enum Import {
    /// The archive is now in the catalog.
    Imported(Comic),
    /// A comic with the same id was already cataloged and has been left as
    /// is. Holds what *would* have been inserted.
    AlreadyCataloged(Comic),
}

/// A fully inspected archive, ready to be written to the catalog.
pub(crate) struct Inspected {
    pub(crate) comic: Comic,
    pub(crate) cover: Vec<u8>,
}

/// Catalogs a single archive.
///
/// Nothing is written unless the cover could be extracted and transcoded, so
/// a malformed archive never shows up in the catalog with partial metadata.
pub async fn import_file(cache: &Repository, path: impl Into<PathBuf>, ctx: &Context) -> LibraryResult<Import> {
    import_file_inner(cache, path.into(), ctx.encoding).await.or_raise(|| LibraryErrorKind::Import)
}

async fn import_file_inner(cache: &Repository, path: PathBuf, encoding: Encoding) -> ImportResult<Import> {
    let inspected = prepare(path, encoding).await?;
    commit(cache, inspected).await
}

/// Runs [`inspect`] on the blocking thread pool.
pub(crate) async fn prepare(path: PathBuf, encoding: Encoding) -> ImportResult<Inspected> {
    tokio::task::spawn_blocking(move || inspect(&path, encoding)).await.or_raise(|| ErrorKind::Interrupted)?
}

#[instrument(skip(encoding), fields(path = %path.display()))]
fn inspect(path: &Path, encoding: Encoding) -> ImportResult<Inspected> {
    let cover = extract_cover(path).or_raise(|| ErrorKind::Archive)?;
    let encoded = encoding.encode(&cover.image).or_raise(|| ErrorKind::Transcode)?;
    let filename = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    let metadata = extract(&filename);
    Ok(Inspected { comic: Comic::new(metadata, cover.modified_at, path), cover: encoded })
}

pub(crate) async fn commit(cache: &Repository, inspected: Inspected) -> ImportResult<Import> {
    let Inspected { comic, cover } = inspected;
    let inserted = cache.upsert(&comic, &cover).await.or_raise(|| ErrorKind::Cache)?;
    Ok(match inserted {
        true => Import::Imported(comic),
        false => Import::AlreadyCataloged(comic),
    })
}
