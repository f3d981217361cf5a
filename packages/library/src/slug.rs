//! Slug and identifier generation.
//!
//! Identifiers are pure functions of titles and positions, so parsing the
//! same text twice yields the same identifiers and deep links stay valid.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Matches characters outside the word/space/hyphen class.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Matches runs of whitespace, underscores and hyphens.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));

/// Generate a URL-safe slug from a title.
///
/// Word characters are Unicode-aware, so Coptic and Arabic titles keep
/// their letters.
///
/// # Examples
/// ```
/// use psalmody_library::slug::slugify;
///
/// assert_eq!(slugify("The First Hour"), "the-first-hour");
/// assert_eq!(slugify("  Psalm 50 (51) -- Have Mercy!  "), "psalm-50-51-have-mercy");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let text: String = title.nfc().collect::<String>().to_lowercase();
    let text = SLUG_NON_WORD.replace_all(&text, "");
    let text = SLUG_SEPARATORS.replace_all(&text, "-");
    text.trim_matches('-').to_string()
}

/// Join a scope tag with non-empty components using hyphens.
fn scoped(tag: &str, components: &[&str]) -> String {
    let mut id = tag.to_string();
    for component in components.iter().filter(|c| !c.is_empty()) {
        id.push('-');
        id.push_str(component);
    }
    id
}

/// Identifier for a category.
#[must_use]
pub fn category_id(title: &str) -> String {
    scoped("cat", &[&slugify(title)])
}

/// Identifier for a book, namespaced by its category title.
#[must_use]
pub fn book_id(category_title: &str, title: &str) -> String {
    scoped("book", &[&slugify(category_title), &slugify(title)])
}

/// Identifier for a section, namespaced by its book title.
///
/// # Examples
/// ```
/// use psalmody_library::slug::section_id;
///
/// assert_ne!(
///     section_id("The First Hour", "Introduction"),
///     section_id("The Third Hour", "Introduction"),
/// );
/// ```
#[must_use]
pub fn section_id(book_title: &str, title: &str) -> String {
    scoped("sec", &[&slugify(book_title), &slugify(title)])
}

/// Identifier for a part at `index` within the section `section_id`.
#[must_use]
pub fn part_id(section_id: &str, index: usize) -> String {
    let base = section_id.strip_prefix("sec").unwrap_or(section_id);
    let base = base.trim_start_matches('-');
    scoped("part", &[base, &index.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Opening Prayer"), "opening-prayer");
        assert_eq!(slugify("The Agpeya"), "the-agpeya");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a  _ - b"), "a-b");
        assert_eq!(slugify("snake_case_title"), "snake-case-title");
        assert_eq!(slugify("--leading and trailing--"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Psalm 116 (117): Praise!"), "psalm-116-117-praise");
        assert_eq!(slugify("\"Quoted\" & <tagged>"), "quoted-tagged");
    }

    #[test]
    fn test_slugify_keeps_non_latin_letters() {
        assert_eq!(slugify("صلاة الشكر"), "صلاة-الشكر");
        assert_eq!(slugify("Ⲡⲓⲁⲅⲓⲟⲥ"), "ⲡⲓⲁⲅⲓⲟⲥ");
    }

    #[test]
    fn test_slugify_normalizes_composition() {
        let composed = "Caf\u{e9}";
        let decomposed = "Cafe\u{301}";
        assert_eq!(slugify(composed), slugify(decomposed));
    }

    #[test]
    fn test_slugify_empty_and_symbols_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_scoped_ids() {
        assert_eq!(category_id("The Agpeya"), "cat-the-agpeya");
        assert_eq!(
            book_id("The Agpeya", "The First Hour"),
            "book-the-agpeya-the-first-hour"
        );
        assert_eq!(
            section_id("The First Hour", "Opening Prayer"),
            "sec-the-first-hour-opening-prayer"
        );
        assert_eq!(
            part_id("sec-the-first-hour-opening-prayer", 2),
            "part-the-first-hour-opening-prayer-2"
        );
    }

    #[test]
    fn test_scoped_ids_omit_empty_components() {
        assert_eq!(category_id(""), "cat");
        assert_eq!(book_id("", "Book"), "book-book");
        assert_eq!(section_id("Book", "!!"), "sec-book");
        assert_eq!(part_id("sec", 0), "part-0");
    }

    #[test]
    fn test_section_ids_namespaced_by_book() {
        assert_ne!(
            section_id("Book One", "Introduction"),
            section_id("Book Two", "Introduction")
        );
    }
}
