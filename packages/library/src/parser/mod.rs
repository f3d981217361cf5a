//! Text-to-library parser.
//!
//! A single linear pass over the source lines, folding each one into a
//! [`ParserState`]. The parser is total: malformed markup is skipped, never
//! reported as an error. Skipped lines can optionally be inspected through
//! [`parse_with_diagnostics`].
//!
//! # Grammar
//!
//! | Line                          | Effect                                   |
//! |-------------------------------|------------------------------------------|
//! | `### Title`                   | new section (with one empty part)        |
//! | `## Title`                    | new book                                 |
//! | `# Title`                     | new category                             |
//! | `---`                         | new part in the current section          |
//! | `[EN]` `[COP]` `[AR]` `[TRAN-EN]` `[TRAN-AR]` | select the active language |
//! | other non-blank text          | paragraph for the active language        |

mod diagnostics;
mod line;
mod state;

pub use diagnostics::{Diagnostic, DiagnosticReason};
pub use line::{LineKind, BOOK_MARKER, CATEGORY_MARKER, PART_DELIMITER, SECTION_MARKER};
pub use state::{DropReason, LineOutcome, NodeKind, ParserState};

use diagnostics::DiagnosticCollector;

use crate::types::Library;

/// Library plus the lines that were skipped while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub library: Library,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse source text into a library.
///
/// # Examples
/// ```
/// use psalmody_library::parser::parse;
/// use psalmody_library::types::Language;
///
/// let library = parse("# Cat\n## Book\n### Sec\n[EN]\nHello\nWorld");
/// let part = &library.categories[0].books[0].sections[0].parts[0];
/// assert_eq!(part.paragraphs(Language::En), ["Hello", "World"]);
/// ```
#[must_use]
pub fn parse(raw: &str) -> Library {
    parse_with_diagnostics(raw).library
}

/// Parse source text and report skipped lines.
#[must_use]
pub fn parse_with_diagnostics(raw: &str) -> ParseOutput {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let (state, collector) = raw.lines().enumerate().fold(
        (ParserState::new(), DiagnosticCollector::default()),
        |(mut state, mut collector), (index, line)| {
            let kind = LineKind::classify(line);
            let outcome = state.apply(&kind);
            collector.record(index + 1, &kind, &outcome);
            (state, collector)
        },
    );

    let library = state.into_library();
    let diagnostics = collector.finish();

    let stats = library.stats();
    tracing::info!(
        categories = stats.categories,
        books = stats.books,
        sections = stats.sections,
        parts = stats.parts,
        skipped_lines = diagnostics.len(),
        "Parsed library"
    );

    ParseOutput {
        library,
        diagnostics,
    }
}
