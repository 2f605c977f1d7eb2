use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Read;
use std::path::Path;
use tracing::instrument;
use zip::result::ZipError;

/// Lists the names of every entry in an archive, in the archive's own order.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn list_entries(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut archive = crate::open(path)?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).or_raise(|| ErrorKind::EntryRead(path.to_path_buf()))?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}

/// Reads the raw bytes of the entry whose name is exactly `name`.
///
/// Returns `Ok(None)` when no entry has that name.
#[instrument(skip_all, fields(path = %path.as_ref().display(), name = %name))]
pub fn read_entry(path: impl AsRef<Path>, name: &str) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    let mut archive = crate::open(path)?;
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err).or_raise(|| ErrorKind::EntryRead(path.to_path_buf())),
    };
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).or_raise(|| ErrorKind::EntryRead(path.to_path_buf()))?;
    Ok(Some(bytes))
}
