use crate::Context;
use crate::error::{Error, ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::import::error::ErrorKind;
use crate::import::file::{Import, commit, prepare};
use crate::scan;
use async_stream::stream;
use futures::{Stream, StreamExt};
use panels_cache::Repository;
use panels_extract::models::Comic;
use std::path::PathBuf;
use std::pin::pin;

/// Progress events emitted by [`import`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once, after the root was validated.
/// 2. [`Imported`](Self::Imported), [`AlreadyCataloged`](Self::AlreadyCataloged)
///    or [`Skipped`](Self::Skipped), once per discovered archive, in
///    traversal order.
/// 3. [`Complete`](Self::Complete), exactly once.
///
/// An error may terminate the stream early, in which case `Complete` is never
/// emitted.
#[derive(Debug)]
pub enum ImportEvent {
    Started,
    /// A new comic was added to the catalog.
    Imported(Comic),
    /// The archive's id was already taken; the catalog is unchanged.
    AlreadyCataloged(Comic),
    /// The archive could not be inspected and was left out of the catalog.
    Skipped { path: PathBuf, reason: Error },
    /// Every discovered archive has been dealt with.
    Complete(Summary),
}

/// Totals for one [`import`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Archives found by the walk.
    pub discovered: u64,
    pub imported: u64,
    pub already_cataloged: u64,
    pub skipped: u64,
}

/// Streams [`ImportEvent`]s while cataloging every archive under `root`.
///
/// The root is checked before anything else: if it isn't a readable directory
/// the only item is an [`ErrorKind::RootPath`](LibraryErrorKind::RootPath)
/// error and nothing is written.
///
/// Up to `ctx.concurrency` archives are inspected at once, but results are
/// committed to the catalog in traversal order. Traversal order isn't sorted,
/// so when two archives share a title the one the filesystem lists first is
/// the one that gets cataloged.
///
/// A broken archive is reported as [`ImportEvent::Skipped`] and the run
/// carries on. Unreadable directories are surfaced as `Err` items without
/// terminating the stream. Only a failure to write to the catalog is fatal.
pub fn import<'a>(
    cache: &'a Repository,
    root: impl Into<PathBuf>,
    ctx: &'a Context,
) -> impl Stream<Item = LibraryResult<ImportEvent>> + 'a {
    let root = root.into();
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        if let Err(e) = scan::check_root(&root).await {
            yield Err(e);
            return;
        }
        tracing::info!(root = %root.display(), dry_run = cache.is_dry_run(), encoding = %ctx.encoding, "import started");
        yield Ok(ImportEvent::Started);

        let encoding = ctx.encoding;
        let prepared = scan::archives(root)
            .map(move |found| async move {
                let path = found?;
                let inspected = prepare(path.clone(), encoding).await;
                Ok::<_, Error>((path, inspected))
            })
            .buffered(ctx.concurrency.max(1));
        let mut prepared = pin!(prepared);

        let mut summary = Summary::default();
        while let Some(found) = prepared.next().await {
            let (path, inspected) = match found {
                Ok(found) => found,
                Err(e) => {
                    yield Err(e);
                    continue;
                },
            };
            summary.discovered += 1;
            let inspected = match inspected {
                Ok(inspected) => inspected,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping archive: {e:?}");
                    summary.skipped += 1;
                    yield Ok(ImportEvent::Skipped { path, reason: e.raise(LibraryErrorKind::Import) });
                    continue;
                },
            };
            match commit(cache, inspected).await {
                Ok(Import::Imported(comic)) => {
                    tracing::debug!(id = %comic.id, path = %path.display(), "imported");
                    summary.imported += 1;
                    yield Ok(ImportEvent::Imported(comic));
                },
                Ok(Import::AlreadyCataloged(comic)) => {
                    tracing::debug!(id = %comic.id, path = %path.display(), "already cataloged");
                    summary.already_cataloged += 1;
                    yield Ok(ImportEvent::AlreadyCataloged(comic));
                },
                Err(e) => {
                    debug_assert!(matches!(*e, ErrorKind::Cache));
                    yield Err(e.raise(LibraryErrorKind::Import));
                    return;
                },
            }
        }

        tracing::info!(?summary, "import complete");
        yield Ok(ImportEvent::Complete(summary));
    })
}
