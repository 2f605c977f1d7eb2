use super::Metadata;
use std::path::PathBuf;
use time::UtcDateTime;

/// A single cataloged archive.
///
/// The `id` is a slug of the title and never changes once the comic is in the
/// catalog; two archives with the same title share an id and only the first
/// one imported is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comic {
    pub id: String,
    pub metadata: Metadata,
    /// Modification time of the cover entry (or the archive itself).
    pub modified_at: UtcDateTime,
    /// When the comic entered the catalog. Set once, never updated.
    pub imported_at: UtcDateTime,
    /// Location of the archive on disk, used for reading pages lazily.
    pub path: PathBuf,
}
impl AsRef<Comic> for Comic {
    fn as_ref(&self) -> &Comic {
        self
    }
}
impl Comic {
    /// Build a comic that is about to be imported, deriving its id from the title.
    pub fn new(metadata: Metadata, modified_at: UtcDateTime, path: impl Into<PathBuf>) -> Self {
        Self {
            id: crate::slug(&metadata.title),
            metadata,
            modified_at,
            imported_at: UtcDateTime::now(),
            path: path.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}
