use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Placeholder for artist/book when the filename doesn't follow the convention.
pub const UNKNOWN: &str = "-";

// Every pattern is lazy so that the first bracket pair wins, not the last.
regex!(ARTIST_REGEX, r"(?s)\[(.*?)\]");
regex!(TITLE_REGEX, r"(?s)\] (.*?)\s*\(");
regex!(BOOK_REGEX, r"(?s)\((.*?)\)");
