//! Line classification.
//!
//! Each physical line maps to exactly one [`LineKind`]. Patterns are checked
//! in a fixed order and the first match wins, so `###` is never read as a
//! book heading.

use crate::types::Language;

/// Marker for section headings.
pub const SECTION_MARKER: &str = "###";

/// Marker for book headings.
pub const BOOK_MARKER: &str = "##";

/// Marker for category headings.
pub const CATEGORY_MARKER: &str = "#";

/// Line that starts a new part within the current section.
pub const PART_DELIMITER: &str = "---";

/// What a single line of source text means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `### Title`
    SectionHeading(&'a str),
    /// `## Title`
    BookHeading(&'a str),
    /// `# Title`
    CategoryHeading(&'a str),
    /// `---`
    PartDelimiter,
    /// One of the language markers, e.g. `[EN]`.
    LanguageTag(Language),
    /// Any other non-blank line, trimmed.
    Text(&'a str),
    /// Empty or whitespace-only line.
    Blank,
}

impl<'a> LineKind<'a> {
    /// Classify a line. Heading titles are the trimmed remainder after the
    /// marker.
    ///
    /// # Examples
    /// ```
    /// use psalmody_library::parser::LineKind;
    /// use psalmody_library::types::Language;
    ///
    /// assert_eq!(LineKind::classify("### Opening"), LineKind::SectionHeading("Opening"));
    /// assert_eq!(LineKind::classify("  [ar]  "), LineKind::LanguageTag(Language::Ar));
    /// assert_eq!(LineKind::classify("  Amen.  "), LineKind::Text("Amen."));
    /// ```
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        if let Some(title) = line.strip_prefix(SECTION_MARKER) {
            return Self::SectionHeading(title.trim());
        }
        if let Some(title) = line.strip_prefix(BOOK_MARKER) {
            return Self::BookHeading(title.trim());
        }
        if let Some(title) = line.strip_prefix(CATEGORY_MARKER) {
            return Self::CategoryHeading(title.trim());
        }

        let trimmed = line.trim();
        if trimmed == PART_DELIMITER {
            return Self::PartDelimiter;
        }
        if let Some(language) = Language::from_marker(trimmed) {
            return Self::LanguageTag(language);
        }
        if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Text(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_precedence() {
        assert_eq!(LineKind::classify("###Sec"), LineKind::SectionHeading("Sec"));
        assert_eq!(LineKind::classify("## Book "), LineKind::BookHeading("Book"));
        assert_eq!(LineKind::classify("# Cat"), LineKind::CategoryHeading("Cat"));
        // Deeper markers still resolve to the longest known marker
        assert_eq!(
            LineKind::classify("#### Deep"),
            LineKind::SectionHeading("# Deep")
        );
    }

    #[test]
    fn test_heading_must_start_the_line() {
        assert_eq!(LineKind::classify("  # Cat"), LineKind::Text("# Cat"));
    }

    #[test]
    fn test_empty_heading_title() {
        assert_eq!(LineKind::classify("#"), LineKind::CategoryHeading(""));
        assert_eq!(LineKind::classify("###   "), LineKind::SectionHeading(""));
    }

    #[test]
    fn test_part_delimiter() {
        assert_eq!(LineKind::classify("---"), LineKind::PartDelimiter);
        assert_eq!(LineKind::classify("  ---\t"), LineKind::PartDelimiter);
        assert_eq!(LineKind::classify("----"), LineKind::Text("----"));
    }

    #[test]
    fn test_language_tags() {
        assert_eq!(LineKind::classify("[EN]"), LineKind::LanguageTag(Language::En));
        assert_eq!(LineKind::classify("[cop]"), LineKind::LanguageTag(Language::Cop));
        assert_eq!(
            LineKind::classify(" [Tran-Ar] "),
            LineKind::LanguageTag(Language::TranAr)
        );
        assert_eq!(LineKind::classify("[EN] Hello"), LineKind::Text("[EN] Hello"));
    }

    #[test]
    fn test_blank_and_text() {
        assert_eq!(LineKind::classify(""), LineKind::Blank);
        assert_eq!(LineKind::classify(" \t "), LineKind::Blank);
        assert_eq!(LineKind::classify("\tGlory be "), LineKind::Text("Glory be"));
    }
}
