/// Descriptive fields parsed from an archive's filename.
///
/// Follows the `[Artist] Title (Book).zip` naming convention. Each field is
/// resolved on its own, so a filename with no artist bracket can still yield a
/// book label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Text between `] ` and the next `(`, or the whole filename.
    pub title: String,
    /// Contents of the first `[...]`, or [`UNKNOWN`](crate::UNKNOWN).
    pub artist: String,
    /// Contents of the first `(...)`, or [`UNKNOWN`](crate::UNKNOWN).
    pub book: String,
}
