//! Document model for the liturgical library.
//!
//! The tree is Library → Category → Book → Section → Part, with each Part
//! holding per-language paragraph lists. Parents own their children by value;
//! the `*_id` back-references on children are plain identifiers used for
//! navigation lookups only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five supported text variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English.
    #[serde(rename = "en")]
    En,

    /// Coptic.
    #[serde(rename = "cop")]
    Cop,

    /// Arabic.
    #[serde(rename = "ar")]
    Ar,

    /// English transliteration of the Coptic.
    #[serde(rename = "tran-en")]
    TranEn,

    /// Arabic transliteration of the Coptic.
    #[serde(rename = "tran-ar")]
    TranAr,
}

impl Language {
    /// All languages, in display order.
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Cop,
        Language::Ar,
        Language::TranEn,
        Language::TranAr,
    ];

    /// Short lowercase code, as used in serialized output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Cop => "cop",
            Self::Ar => "ar",
            Self::TranEn => "tran-en",
            Self::TranAr => "tran-ar",
        }
    }

    /// The marker line that selects this language in the source text.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::En => "[EN]",
            Self::Cop => "[COP]",
            Self::Ar => "[AR]",
            Self::TranEn => "[TRAN-EN]",
            Self::TranAr => "[TRAN-AR]",
        }
    }

    /// Parse a marker line, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use psalmody_library::types::Language;
    ///
    /// assert_eq!(Language::from_marker(" [tran-en] "), Some(Language::TranEn));
    /// assert_eq!(Language::from_marker("[FR]"), None);
    /// ```
    #[must_use]
    pub fn from_marker(line: &str) -> Option<Self> {
        let line = line.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.marker().eq_ignore_ascii_case(line))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a part.
///
/// The markup has no syntax for this, so parsed parts are always `Prayer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    #[default]
    Prayer,
    Hymn,
    Reading,
    Instruction,
}

/// Atomic fragment of devotional text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,

    /// Identifier of the owning section.
    pub section_id: String,

    #[serde(default)]
    pub kind: PartKind,

    /// Paragraphs per language. A missing key means "not authored".
    #[serde(default)]
    pub content: BTreeMap<Language, Vec<String>>,
}

impl Part {
    /// Create an empty part.
    #[must_use]
    pub fn new(id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            kind: PartKind::default(),
            content: BTreeMap::new(),
        }
    }

    /// Append a paragraph for `language`.
    pub fn push_paragraph(&mut self, language: Language, paragraph: impl Into<String>) {
        self.content
            .entry(language)
            .or_default()
            .push(paragraph.into());
    }

    /// Paragraphs for `language`; empty when that language was not authored.
    #[must_use]
    pub fn paragraphs(&self, language: Language) -> &[String] {
        self.content
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Languages that have content in this part.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.content.keys().copied()
    }

    /// Whether no language has any paragraph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.values().all(Vec::is_empty)
    }
}

/// Named subdivision of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,

    /// Identifier of the owning book.
    pub book_id: String,

    pub title: String,

    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            book_id: book_id.into(),
            title: title.into(),
            parts: Vec::new(),
        }
    }
}

/// A liturgical text unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,

    /// Identifier of the owning category.
    pub category_id: String,

    pub title: String,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Book {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// All parts of the book in reading order (section by section).
    pub fn parts(&self) -> impl Iterator<Item = &Part> + '_ {
        self.sections.iter().flat_map(|s| s.parts.iter())
    }

    /// Index of the first part of `section_id` in [`Book::parts`].
    ///
    /// Used to jump straight to a section.
    #[must_use]
    pub fn first_part_index(&self, section_id: &str) -> Option<usize> {
        let mut offset = 0;
        for section in &self.sections {
            if section.id == section_id {
                return Some(offset);
            }
            offset += section.parts.len();
        }
        None
    }

    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }
}

/// Top-level grouping of books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub books: Vec<Book>,
}

impl Category {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            books: Vec::new(),
        }
    }
}

/// Root of the document model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Node counts for a library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub categories: usize,
    pub books: usize,
    pub sections: usize,
    pub parts: usize,
    pub paragraphs: usize,
}

impl Library {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// All books across categories, in document order.
    pub fn books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.categories.iter().flat_map(|c| c.books.iter())
    }

    #[must_use]
    pub fn book(&self, book_id: &str) -> Option<&Book> {
        self.books().find(|b| b.id == book_id)
    }

    /// Find a section together with the book that owns it.
    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<(&Book, &Section)> {
        self.books()
            .find_map(|book| book.section(section_id).map(|section| (book, section)))
    }

    #[must_use]
    pub fn stats(&self) -> LibraryStats {
        let mut stats = LibraryStats {
            categories: self.categories.len(),
            ..LibraryStats::default()
        };
        for book in self.books() {
            stats.books += 1;
            stats.sections += book.sections.len();
            for part in book.parts() {
                stats.parts += 1;
                stats.paragraphs += part.content.values().map(Vec::len).sum::<usize>();
            }
        }
        stats
    }
}
