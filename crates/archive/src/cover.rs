use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use image::DynamicImage;
use std::io::Read;
use std::path::Path;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcDateTime};
use tracing::instrument;

/// The decoded cover of an archive.
#[derive(Debug, Clone)]
pub struct Cover {
    pub image: DynamicImage,
    /// Modification time of the cover entry, or of the archive file when the
    /// entry doesn't carry one.
    pub modified_at: UtcDateTime,
}

/// Opens an archive and decodes its first entry as an image.
///
/// The cover is the entry at index 0 in the archive's internal listing: it is
/// not sorted, and not filtered by name. Fails with:
/// - [`ErrorKind::Open`] if the file can't be opened as a zip archive,
/// - [`ErrorKind::Empty`] if the archive has no entries,
/// - [`ErrorKind::EntryRead`] if the cover's stream is truncated or corrupt,
/// - [`ErrorKind::ImageDecode`] if the cover is not an image.
#[instrument(skip_all, fields(path = %path.as_ref().display(), entry))]
pub fn extract_cover(path: impl AsRef<Path>) -> Result<Cover> {
    let path = path.as_ref();
    let mut archive = crate::open(path)?;
    if archive.len() == 0 {
        exn::bail!(ErrorKind::Empty(path.to_path_buf()));
    }
    let (bytes, entry_modified) = {
        let mut entry = archive.by_index(0).or_raise(|| ErrorKind::EntryRead(path.to_path_buf()))?;
        tracing::Span::current().record("entry", entry.name());
        // Sizes come from the archive itself, don't trust them for more than a hint.
        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0).min(64 * 1024 * 1024));
        entry.read_to_end(&mut bytes).or_raise(|| ErrorKind::EntryRead(path.to_path_buf()))?;
        (bytes, entry.last_modified().and_then(from_zip_datetime))
    };
    let image = image::load_from_memory(&bytes).or_raise(|| ErrorKind::ImageDecode(path.to_path_buf()))?;
    let modified_at = match entry_modified {
        Some(modified) => modified,
        None => file_modified(path)?,
    };
    Ok(Cover { image, modified_at })
}

/// Zip entries store local (timezone-less) DOS timestamps; they're read as UTC.
pub(crate) fn from_zip_datetime(datetime: zip::DateTime) -> Option<UtcDateTime> {
    let month = Month::try_from(datetime.month()).ok()?;
    let date = Date::from_calendar_date(i32::from(datetime.year()), month, datetime.day()).ok()?;
    let time = Time::from_hms(datetime.hour(), datetime.minute(), datetime.second()).ok()?;
    Some(PrimitiveDateTime::new(date, time).as_utc())
}

fn file_modified(path: &Path) -> Result<UtcDateTime> {
    let modified = std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
    Ok(OffsetDateTime::from(modified).to_utc())
}
