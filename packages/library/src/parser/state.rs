//! Parser cursor state and the per-line transition function.
//!
//! The state owns the library under construction plus five cursors: the
//! current category, book, section, part and active language. Cursors are
//! indices into the tree, so the library is the only owner of every node.

use super::line::LineKind;
use crate::slug;
use crate::types::{Book, Category, Language, Library, Part, Section};

/// Kind of node a line created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Category,
    Book,
    Section,
    Part,
}

/// Why a line had no effect on the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Book heading before any category.
    NoCategory,
    /// Section heading with no current book.
    NoBook,
    /// Part delimiter with no current section.
    NoSection,
    /// Language tag or text with no current part.
    NoPart,
    /// Text inside a part before any language tag.
    NoActiveLanguage,
}

/// Result of applying one line to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A node was created and appended to its parent.
    Created { node: NodeKind, id: String },
    /// The active language changed.
    LanguageSelected(Language),
    /// A paragraph was appended to the current part.
    Appended,
    /// Blank line.
    Ignored,
    /// The line was discarded.
    Dropped(DropReason),
}

/// Cursor state of the parser.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    library: Library,
    category: Option<usize>,
    book: Option<usize>,
    section: Option<usize>,
    part: Option<usize>,
    language: Option<Language>,
}

impl ParserState {
    /// Fresh state with an empty library and no cursors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The library built so far.
    #[must_use]
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Currently selected language, if any.
    #[must_use]
    pub fn active_language(&self) -> Option<Language> {
        self.language
    }

    /// Finish parsing and hand over the library.
    #[must_use]
    pub fn into_library(self) -> Library {
        self.library
    }

    /// Classify and apply a single line.
    pub fn step(&mut self, line: &str) -> LineOutcome {
        self.apply(&LineKind::classify(line))
    }

    /// Apply an already classified line.
    pub fn apply(&mut self, kind: &LineKind<'_>) -> LineOutcome {
        match *kind {
            LineKind::SectionHeading(title) => self.open_section(title),
            LineKind::BookHeading(title) => self.open_book(title),
            LineKind::CategoryHeading(title) => self.open_category(title),
            LineKind::PartDelimiter => self.open_part(),
            LineKind::LanguageTag(language) => self.select_language(language),
            LineKind::Text(text) => self.append_text(text),
            LineKind::Blank => LineOutcome::Ignored,
        }
    }

    fn open_category(&mut self, title: &str) -> LineOutcome {
        self.book = None;
        self.section = None;
        self.part = None;
        self.language = None;

        let id = slug::category_id(title);
        self.library
            .categories
            .push(Category::new(id.clone(), title));
        self.category = Some(self.library.categories.len() - 1);

        LineOutcome::Created {
            node: NodeKind::Category,
            id,
        }
    }

    fn open_book(&mut self, title: &str) -> LineOutcome {
        self.book = None;
        self.section = None;
        self.part = None;
        self.language = None;

        let Some(category) = self.current_category_mut() else {
            return LineOutcome::Dropped(DropReason::NoCategory);
        };
        let id = slug::book_id(&category.title, title);
        let book = Book::new(id.clone(), category.id.clone(), title);
        category.books.push(book);
        let index = category.books.len() - 1;
        self.book = Some(index);

        LineOutcome::Created {
            node: NodeKind::Book,
            id,
        }
    }

    fn open_section(&mut self, title: &str) -> LineOutcome {
        self.section = None;
        self.part = None;
        self.language = None;

        let Some(book) = self.current_book_mut() else {
            return LineOutcome::Dropped(DropReason::NoBook);
        };
        let id = slug::section_id(&book.title, title);
        let mut section = Section::new(id.clone(), book.id.clone(), title);
        // Content before the first `---` lands in this part
        section
            .parts
            .push(Part::new(slug::part_id(&id, 0), id.clone()));
        book.sections.push(section);
        let index = book.sections.len() - 1;
        self.section = Some(index);
        self.part = Some(0);

        LineOutcome::Created {
            node: NodeKind::Section,
            id,
        }
    }

    fn open_part(&mut self) -> LineOutcome {
        self.language = None;

        let Some(section) = self.current_section_mut() else {
            return LineOutcome::Dropped(DropReason::NoSection);
        };
        let index = section.parts.len();
        let id = slug::part_id(&section.id, index);
        section
            .parts
            .push(Part::new(id.clone(), section.id.clone()));
        self.part = Some(index);

        LineOutcome::Created {
            node: NodeKind::Part,
            id,
        }
    }

    fn select_language(&mut self, language: Language) -> LineOutcome {
        if self.current_part_mut().is_none() {
            return LineOutcome::Dropped(DropReason::NoPart);
        }
        self.language = Some(language);
        LineOutcome::LanguageSelected(language)
    }

    fn append_text(&mut self, text: &str) -> LineOutcome {
        let language = self.language;
        let Some(part) = self.current_part_mut() else {
            return LineOutcome::Dropped(DropReason::NoPart);
        };
        let Some(language) = language else {
            return LineOutcome::Dropped(DropReason::NoActiveLanguage);
        };
        part.push_paragraph(language, text);
        LineOutcome::Appended
    }

    fn current_category_mut(&mut self) -> Option<&mut Category> {
        let index = self.category?;
        self.library.categories.get_mut(index)
    }

    fn current_book_mut(&mut self) -> Option<&mut Book> {
        let index = self.book?;
        self.current_category_mut()?.books.get_mut(index)
    }

    fn current_section_mut(&mut self) -> Option<&mut Section> {
        let index = self.section?;
        self.current_book_mut()?.sections.get_mut(index)
    }

    fn current_part_mut(&mut self) -> Option<&mut Part> {
        let index = self.part?;
        self.current_section_mut()?.parts.get_mut(index)
    }
}
