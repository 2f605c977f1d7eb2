//! Archive filename matching.

use std::path::Path;

/// Extension that marks a file as a comic archive.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Returns `true` if the file name looks like a comic archive.
///
/// This is a case-insensitive substring match on the file name (not only the
/// final extension), so `issue.ZIP` and `issue.zip.part` both match.
///
/// # Examples
///
/// ```
/// use panels_archive::is_archive;
/// assert!(is_archive("library/[Someone] Title (Book).zip"));
/// assert!(is_archive("SHOUTING.ZIP"));
/// assert!(!is_archive("notes.txt"));
/// // Only the file name is considered, not parent directories.
/// assert!(!is_archive("backup.zip.d/notes.txt"));
/// ```
pub fn is_archive(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase().contains(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("comic.zip", true)]
    #[case("Comic.Zip", true)]
    #[case("nested/dir/comic.zip", true)]
    #[case("comic.zip.bak", true)]
    #[case("comic.cbz", false)]
    #[case("zip", false)]
    #[case("comiczip", false)]
    #[case("", false)]
    fn test_is_archive(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_archive(path), expected);
    }
}
