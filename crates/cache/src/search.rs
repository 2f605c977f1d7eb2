//! Search parameters for listing the catalog.

use crate::error::{ErrorKind, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Default number of entries on one page of results.
pub const DEFAULT_PAGE_SIZE: u32 = 12;
const DEFAULT_SORT_FIELD: &str = "imported_at";
const DEFAULT_SORT_DIRECTION: &str = "DESC";

// The sort clause is interpolated into SQL; nothing else may be.
static SORT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_ ]+$").unwrap());

/// A window into the ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}
impl Page {
    /// Zero-based page number of the given size.
    pub fn numbered(page: u32, size: u32) -> Self {
        Self { offset: page.saturating_mul(size), limit: size }
    }
}
impl Default for Page {
    fn default() -> Self {
        Self::numbered(0, DEFAULT_PAGE_SIZE)
    }
}

/// Column and direction to order results by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: String,
}
impl Sort {
    pub fn new(field: impl Into<String>, direction: impl Into<String>) -> Self {
        Self { field: field.into(), direction: direction.into() }
    }

    /// The `ORDER BY` clause, if both parts pass the allow-list.
    ///
    /// The field must name something; the direction may be left empty.
    pub(crate) fn clause(&self) -> Result<String> {
        let clause = format!("{} {}", self.field, self.direction);
        let field_ok = SORT_REGEX.is_match(&self.field) && !self.field.trim().is_empty();
        let direction_ok = self.direction.is_empty() || SORT_REGEX.is_match(&self.direction);
        if !field_ok || !direction_ok {
            exn::bail!(ErrorKind::InvalidSort(clause));
        }
        Ok(clause)
    }
}
impl Default for Sort {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_FIELD, DEFAULT_SORT_DIRECTION)
    }
}

/// A filtered, sorted and paginated listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    pub page: Page,
    /// Only list bookmarked comics.
    pub library_only: bool,
    /// Substring matched against artist, title or book. Case is ignored for
    /// ASCII letters only; other letters must match exactly.
    pub keywords: Option<String>,
    pub sort: Sort,
}
impl Search {
    /// The `LIKE` pattern for the keyword filter, with wildcards in the user's
    /// text escaped. Blank keywords mean no filter.
    pub(crate) fn keyword_pattern(&self) -> Option<String> {
        let keywords = self.keywords.as_deref().filter(|k| !k.is_empty())?;
        Some(format!("%{}%", escape_like(keywords)))
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 12, 0)]
    #[case(1, 12, 12)]
    #[case(3, 5, 15)]
    #[case(u32::MAX, 12, u32::MAX)]
    fn test_numbered_page(#[case] page: u32, #[case] size: u32, #[case] offset: u32) {
        let page = Page::numbered(page, size);
        assert_eq!(page.offset, offset);
        assert_eq!(page.limit, size);
    }

    #[rstest]
    #[case("imported_at", "DESC")]
    #[case("title", "asc")]
    #[case("artist", "")]
    fn test_allowed_sort(#[case] field: &str, #[case] direction: &str) {
        assert!(Sort::new(field, direction).clause().is_ok());
    }

    #[rstest]
    #[case("title; DROP TABLE comics", "ASC")]
    #[case("title", "ASC --")]
    #[case("title,artist", "ASC")]
    #[case("(SELECT 1)", "ASC")]
    #[case("title", "ASC\n")]
    #[case("", "ASC")]
    #[case(" ", "DESC")]
    #[case("", "")]
    #[case("title", "ASC;")]
    fn test_rejected_sort(#[case] field: &str, #[case] direction: &str) {
        let err = Sort::new(field, direction).clause().unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidSort(_)));
    }

    #[test]
    fn test_default_sort() {
        assert_eq!(Sort::default().clause().unwrap(), "imported_at DESC");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("conan"), Some("%conan%"))]
    #[case(Some("100%"), Some("%100\\%%"))]
    #[case(Some("a_b\\c"), Some("%a\\_b\\\\c%"))]
    fn test_keyword_pattern(#[case] keywords: Option<&str>, #[case] expected: Option<&str>) {
        let search = Search { keywords: keywords.map(String::from), ..Default::default() };
        assert_eq!(search.keyword_pattern().as_deref(), expected);
    }
}
