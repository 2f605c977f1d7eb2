use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use panels_transcode::Encoding;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Counts of what happened to each entry of a recompressed archive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Recompressed {
    /// Entries decoded as images and re-encoded.
    pub reencoded: u64,
    /// Entries written through unchanged (not images, or rejected by the encoder).
    pub copied: u64,
}

/// Writes a copy of `source` to `destination` with every page re-encoded.
///
/// Entry names, order and timestamps are kept. Entries that aren't decodable
/// images, and images the encoder rejects, are copied byte-for-byte so the
/// copy never loses pages. The source archive is left untouched.
///
/// The copy is written next to `destination` under a temporary name and only
/// moved into place once complete, so on failure whatever was already at
/// `destination` is left as it was.
#[instrument(skip_all, fields(source = %source.as_ref().display(), destination = %destination.as_ref().display(), %encoding))]
pub fn recompress(source: impl AsRef<Path>, destination: impl AsRef<Path>, encoding: Encoding) -> Result<Recompressed> {
    let (source, destination) = (source.as_ref(), destination.as_ref());
    let mut archive = crate::open(source)?;
    let partial = partial_path(destination);
    let result = write_copy(&mut archive, source, &partial, encoding)
        .and_then(|stats| {
            std::fs::rename(&partial, destination).or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
            Ok(stats)
        });
    if result.is_err() {
        _ = std::fs::remove_file(&partial);
    }
    result
}

fn partial_path(destination: &Path) -> PathBuf {
    let name = destination.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    destination.with_file_name(format!(".{name}.partial"))
}

fn write_copy(archive: &mut crate::Archive, source: &Path, destination: &Path, encoding: Encoding) -> Result<Recompressed> {
    let file = File::create(destination).or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let mut stats = Recompressed::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).or_raise(|| ErrorKind::EntryRead(source.to_path_buf()))?;
        let name = entry.name().to_string();
        let mut options = SimpleFileOptions::default();
        if let Some(modified) = entry.last_modified() {
            options = options.last_modified_time(modified);
        }
        if entry.is_dir() {
            writer.add_directory(name, options).or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
            continue;
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).or_raise(|| ErrorKind::EntryRead(source.to_path_buf()))?;
        let reencoded = image::load_from_memory(&bytes).ok().and_then(|image| match encoding.encode(&image) {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                tracing::warn!(entry = %name, error = ?err, "Page rejected by encoder; copying as-is");
                None
            },
        });
        let (data, method) = match reencoded {
            // WebP is already compressed, deflating it again only costs time.
            Some(encoded) => {
                stats.reencoded += 1;
                (encoded, CompressionMethod::Stored)
            },
            None => {
                stats.copied += 1;
                (bytes, CompressionMethod::Deflated)
            },
        };
        writer
            .start_file(name, options.compression_method(method))
            .or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
        writer.write_all(&data).or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
    }

    let mut inner = writer.finish().or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
    inner.flush().or_raise(|| ErrorKind::Write(destination.to_path_buf()))?;
    tracing::debug!(reencoded = stats.reencoded, copied = stats.copied, "Archive recompressed");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{list_entries, read_entry, testing};

    #[test]
    fn test_recompress_keeps_listing() {
        let dir = tempfile::tempdir().unwrap();
        let (one, two) = (testing::png(8, 8), testing::png(3, 5));
        let source = testing::archive(
            dir.path(),
            "comic.zip",
            &[("02.png", &two), ("notes.txt", b"hello"), ("01.png", &one)],
        );
        let destination = dir.path().join("Copy of -comic.zip");
        let stats = recompress(&source, &destination, Encoding::Lossless).unwrap();
        assert_eq!(stats, Recompressed { reencoded: 2, copied: 1 });
        assert_eq!(list_entries(&destination).unwrap(), list_entries(&source).unwrap());
        assert_eq!(read_entry(&destination, "notes.txt").unwrap().unwrap(), b"hello");
        let page = read_entry(&destination, "02.png").unwrap().unwrap();
        assert_eq!(&page[0..4], b"RIFF");
        let decoded = image::load_from_memory(&page).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 5));
    }

    #[test]
    fn test_recompress_leaves_source_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let page = testing::png(4, 4);
        let source = testing::archive(dir.path(), "comic.zip", &[("01.png", &page)]);
        let before = std::fs::read(&source).unwrap();
        recompress(&source, dir.path().join("copy.zip"), Encoding::default()).unwrap();
        assert_eq!(std::fs::read(&source).unwrap(), before);
    }

    #[test]
    fn test_recompress_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.zip");
        std::fs::write(&source, b"garbage").unwrap();
        let err = recompress(&source, dir.path().join("copy.zip"), Encoding::Lossless).unwrap_err();
        assert!(matches!(*err, ErrorKind::Open(_)));
    }

    #[test]
    fn test_failed_recompress_keeps_existing_copy() {
        let dir = tempfile::tempdir().unwrap();
        let page = testing::png(4, 4);
        let source = testing::archive(dir.path(), "comic.zip", &[("01.png", &page)]);
        let destination = dir.path().join("Copy of -comic.zip");
        recompress(&source, &destination, Encoding::Lossless).unwrap();
        let good = std::fs::read(&destination).unwrap();

        std::fs::write(&source, b"truncated").unwrap();
        let err = recompress(&source, &destination, Encoding::Lossless).unwrap_err();
        assert!(matches!(*err, ErrorKind::Open(_)));
        assert_eq!(std::fs::read(&destination).unwrap(), good);
    }

    #[test]
    fn test_failure_mid_write_leaves_no_partial_copy() {
        let dir = tempfile::tempdir().unwrap();
        let page = testing::png(4, 4);
        let payload = b"page data that will be corrupted on disk".as_slice();
        let source = testing::archive(dir.path(), "comic.zip", &[("01.png", &page), ("02.txt", payload)]);
        let mut bytes = std::fs::read(&source).unwrap();
        let offset = bytes.windows(payload.len()).position(|w| w == payload).unwrap();
        bytes[offset] ^= 0xFF;
        std::fs::write(&source, bytes).unwrap();

        let destination = dir.path().join("Copy of -comic.zip");
        std::fs::write(&destination, b"previous copy").unwrap();
        let err = recompress(&source, &destination, Encoding::Lossless).unwrap_err();
        assert!(matches!(*err, ErrorKind::EntryRead(_)));
        assert_eq!(std::fs::read(&destination).unwrap(), b"previous copy");
        assert!(!partial_path(&destination).exists());
    }
}
