mod comic;
mod metadata;

pub use self::comic::Comic;
pub use self::metadata::Metadata;
