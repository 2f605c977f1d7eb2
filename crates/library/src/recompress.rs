//! Batch recompression of a collection.
//!
//! Writes a copy of every archive under a root into an output directory, named
//! `Copy of -<original name>`, with every page re-encoded. Originals are never
//! touched, and the catalog is not involved.

use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::scan;
use exn::ResultExt;
use futures::StreamExt;
use panels_archive::Recompressed;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Prefix given to every recompressed copy.
pub const COPY_PREFIX: &str = "Copy of -";

/// Totals for one [`recompress`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Archives successfully written.
    pub archives: u64,
    pub pages_reencoded: u64,
    pub pages_copied: u64,
    /// Archives that could not be recompressed (or whose copy name clashed).
    pub failed: u64,
}

fn is_copy(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name.to_string_lossy().starts_with(COPY_PREFIX))
}

/// Recompresses every archive under `root` into `output`.
///
/// A copy that fails part-way never replaces one left by an earlier run.
///
/// The tree is fully walked before the first copy is written, and archives
/// that are themselves copies are left alone, so `output` may sit inside
/// `root`. Failures are per archive: they are logged, counted and the rest of
/// the collection is still processed. Only an unusable `root` or `output` is
/// fatal.
pub async fn recompress(root: impl Into<PathBuf>, output: impl Into<PathBuf>, ctx: &Context) -> Result<Summary> {
    let (root, output) = (root.into(), output.into());
    scan::check_root(&root).await?;
    tokio::fs::create_dir_all(&output).await.or_raise(|| ErrorKind::RootPath(output.clone()))?;
    tracing::info!(root = %root.display(), output = %output.display(), encoding = %ctx.encoding, "recompressing");

    let mut sources = Vec::new();
    let mut archives = std::pin::pin!(scan::archives(&root));
    while let Some(found) = archives.next().await {
        match found {
            Ok(path) if is_copy(&path) => tracing::debug!(path = %path.display(), "skipping earlier copy"),
            Ok(path) => sources.push(path),
            // Already logged by the walk.
            Err(_) => {},
        }
    }

    let mut summary = Summary::default();
    let mut claimed = HashSet::new();
    let mut jobs = Vec::new();
    for source in sources {
        let Some(name) = source.file_name() else { continue };
        let destination = output.join(format!("{COPY_PREFIX}{}", name.to_string_lossy()));
        if !claimed.insert(destination.clone()) {
            tracing::warn!(path = %source.display(), "another archive with the same name is already being copied");
            summary.failed += 1;
            continue;
        }
        jobs.push((source, destination));
    }

    let encoding = ctx.encoding;
    let mut results = futures::stream::iter(jobs)
        .map(|(source, destination)| async move {
            let result = recompress_one(source.clone(), destination, encoding).await;
            (source, result)
        })
        .buffer_unordered(ctx.concurrency.max(1));
    while let Some((source, result)) = results.next().await {
        match result {
            Ok(stats) => {
                summary.archives += 1;
                summary.pages_reencoded += stats.reencoded;
                summary.pages_copied += stats.copied;
            },
            Err(e) => {
                tracing::warn!(path = %source.display(), "skipping archive: {e:?}");
                summary.failed += 1;
            },
        }
    }
    tracing::info!(?summary, "recompression complete");
    Ok(summary)
}

async fn recompress_one(source: PathBuf, destination: PathBuf, encoding: panels_transcode::Encoding) -> Result<Recompressed> {
    tokio::task::spawn_blocking(move || panels_archive::recompress(&source, &destination, encoding))
        .await
        .or_raise(|| ErrorKind::Recompress)?
        .or_raise(|| ErrorKind::Recompress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use panels_transcode::Encoding;
    use std::fs;

    #[tokio::test]
    async fn test_recompress_collection() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("comics");
        let output = temp.path().join("out");
        fs::create_dir_all(root.join("nested")).unwrap();
        let page = testing::png(8, 8);
        testing::archive(&root, "[A] One (B).zip", &[("1.png", &page), ("2.png", &page), ("info.txt", b"x")]);
        testing::archive(&root.join("nested"), "[A] Two (B).zip", &[("1.png", &page)]);
        fs::write(root.join("[A] Broken (B).zip"), b"not a zip").unwrap();

        let ctx = Context::new(Encoding::Lossless, 2);
        let summary = recompress(&root, &output, &ctx).await.unwrap();
        assert_eq!(summary, Summary { archives: 2, pages_reencoded: 3, pages_copied: 1, failed: 1 });
        assert!(output.join("Copy of -[A] One (B).zip").is_file());
        assert!(output.join("Copy of -[A] Two (B).zip").is_file());
        assert!(!output.join("Copy of -[A] Broken (B).zip").exists());
        // Originals are untouched.
        assert!(root.join("[A] One (B).zip").is_file());
    }

    #[tokio::test]
    async fn test_output_inside_root() {
        let temp = tempfile::tempdir().unwrap();
        let page = testing::png(4, 4);
        testing::archive(temp.path(), "[A] One (B).zip", &[("1.png", &page)]);

        let ctx = Context::default();
        let first = recompress(temp.path(), temp.path(), &ctx).await.unwrap();
        assert_eq!(first.archives, 1);
        // The copy from the first run isn't copied again.
        let second = recompress(temp.path(), temp.path(), &ctx).await.unwrap();
        assert_eq!(second.archives, 1);
        assert!(!temp.path().join("Copy of -Copy of -[A] One (B).zip").exists());
    }

    #[tokio::test]
    async fn test_missing_root() {
        let temp = tempfile::tempdir().unwrap();
        let err = recompress(temp.path().join("missing"), temp.path(), &Context::default()).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::RootPath(_)));
    }

    #[tokio::test]
    async fn test_failed_rerun_keeps_earlier_copy() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("comics");
        let output = temp.path().join("out");
        fs::create_dir_all(&root).unwrap();
        let page = testing::png(4, 4);
        let source = testing::archive(&root, "[A] One (B).zip", &[("1.png", &page)]);
        let ctx = Context::default();
        assert_eq!(recompress(&root, &output, &ctx).await.unwrap().archives, 1);
        let copy = output.join("Copy of -[A] One (B).zip");
        let good = fs::read(&copy).unwrap();

        fs::write(&source, b"truncated").unwrap();
        let summary = recompress(&root, &output, &ctx).await.unwrap();
        assert_eq!((summary.archives, summary.failed), (0, 1));
        assert_eq!(fs::read(&copy).unwrap(), good);
    }
}
