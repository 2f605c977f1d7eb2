use crate::error::{ErrorKind, Result};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use panels_archive::is_archive;
use std::path::{Path, PathBuf};

/// Fails with [`ErrorKind::RootPath`] unless `root` is an existing directory.
pub async fn check_root(root: &Path) -> Result<()> {
    match tokio::fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => exn::bail!(ErrorKind::RootPath(root.to_path_buf())),
        Err(e) => Err(e).or_raise(|| ErrorKind::RootPath(root.to_path_buf())),
    }
}

/// Lazily walks `root` depth-first, yielding every file whose name looks like
/// an archive.
///
/// Entries come out in the order the filesystem lists them; nothing is sorted.
/// A directory that can't be read is yielded as an [`ErrorKind::Scan`] error
/// and skipped, the rest of the tree is still walked. Symbolic links to
/// directories are not followed.
pub fn archives(root: impl Into<PathBuf>) -> impl Stream<Item = Result<PathBuf>> {
    let root = root.into();
    stream!({
        let mut pending = vec![root];
        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %dir.display(), "skipping unreadable directory: {e}");
                    yield Err::<PathBuf, _>(e).or_raise(|| ErrorKind::Scan);
                    continue;
                },
            };
            let mut subdirs = Vec::new();
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(path = %dir.display(), "directory listing interrupted: {e}");
                        yield Err::<PathBuf, _>(e).or_raise(|| ErrorKind::Scan);
                        break;
                    },
                };
                let path = entry.path();
                match entry.file_type().await {
                    Ok(kind) if kind.is_dir() => subdirs.push(path),
                    Ok(_) if is_archive(&path) => yield Ok(path),
                    Ok(_) => tracing::trace!(path = %path.display(), "not an archive"),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "could not determine file type: {e}");
                        yield Err::<PathBuf, _>(e).or_raise(|| ErrorKind::Scan);
                    },
                }
            }
            // Reversed so the first listed subdirectory is walked next.
            pending.extend(subdirs.into_iter().rev());
        }
    })
}
