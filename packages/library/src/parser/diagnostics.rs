//! Diagnostics for lines the parser skipped.
//!
//! Diagnostics are purely additive: collecting them never changes the parsed
//! library.

use std::collections::HashSet;
use std::fmt;

use super::line::LineKind;
use super::state::{DropReason, LineOutcome, NodeKind};
use crate::types::Language;

/// Why a line was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReason {
    /// `##` heading before any `#` heading.
    OrphanBook,
    /// `###` heading with no current book.
    OrphanSection,
    /// `---` with no current section.
    StrayPartDelimiter,
    /// Language marker with no current part.
    StrayLanguageTag(Language),
    /// Text inside a part before any language marker.
    TextWithoutLanguage,
    /// Text outside any section.
    TextWithoutPart,
    /// A heading produced an identifier that was already issued.
    ///
    /// Reported once per heading. Parts under the repeated heading share
    /// its prefix and are not reported again.
    DuplicateIdentifier(String),
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanBook => f.write_str("book heading before any category; book discarded"),
            Self::OrphanSection => {
                f.write_str("section heading outside a book; section and its content discarded")
            }
            Self::StrayPartDelimiter => f.write_str("part delimiter outside a section; ignored"),
            Self::StrayLanguageTag(lang) => {
                write!(f, "language tag {} outside a section; ignored", lang.marker())
            }
            Self::TextWithoutLanguage => f.write_str("text before any language tag; ignored"),
            Self::TextWithoutPart => f.write_str("text outside a section; ignored"),
            Self::DuplicateIdentifier(id) => {
                write!(f, "identifier '{id}' already used; deep links will hit the first one")
            }
        }
    }
}

/// A reported line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    pub reason: DiagnosticReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Turns line outcomes into diagnostics.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    issued_ids: HashSet<String>,
}

impl DiagnosticCollector {
    pub(crate) fn record(&mut self, line: usize, kind: &LineKind<'_>, outcome: &LineOutcome) {
        let reason = match outcome {
            // Part ids derive from their section id, so a repeated part id
            // always follows a reported section.
            LineOutcome::Created {
                node: NodeKind::Part,
                ..
            } => return,
            LineOutcome::Created { id, .. } => {
                if self.issued_ids.insert(id.clone()) {
                    return;
                }
                DiagnosticReason::DuplicateIdentifier(id.clone())
            }
            LineOutcome::Dropped(reason) => match (reason, kind) {
                (DropReason::NoCategory, _) => DiagnosticReason::OrphanBook,
                (DropReason::NoBook, _) => DiagnosticReason::OrphanSection,
                (DropReason::NoSection, _) => DiagnosticReason::StrayPartDelimiter,
                (DropReason::NoPart, LineKind::LanguageTag(lang)) => {
                    DiagnosticReason::StrayLanguageTag(*lang)
                }
                (DropReason::NoPart, _) => DiagnosticReason::TextWithoutPart,
                (DropReason::NoActiveLanguage, _) => DiagnosticReason::TextWithoutLanguage,
            },
            LineOutcome::LanguageSelected(_) | LineOutcome::Appended | LineOutcome::Ignored => {
                return
            }
        };

        tracing::debug!(line, reason = %reason, "Skipped line");
        self.diagnostics.push(Diagnostic { line, reason });
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            line: 7,
            reason: DiagnosticReason::StrayLanguageTag(Language::Cop),
        };
        assert_eq!(
            diagnostic.to_string(),
            "line 7: language tag [COP] outside a section; ignored"
        );
    }

    #[test]
    fn test_collector_maps_drop_reasons() {
        let mut collector = DiagnosticCollector::default();
        collector.record(
            1,
            &LineKind::LanguageTag(Language::En),
            &LineOutcome::Dropped(DropReason::NoPart),
        );
        collector.record(
            2,
            &LineKind::Text("x"),
            &LineOutcome::Dropped(DropReason::NoPart),
        );
        collector.record(3, &LineKind::Blank, &LineOutcome::Ignored);

        let reasons: Vec<DiagnosticReason> =
            collector.finish().into_iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![
                DiagnosticReason::StrayLanguageTag(Language::En),
                DiagnosticReason::TextWithoutPart,
            ]
        );
    }

    #[test]
    fn test_collector_flags_duplicate_ids() {
        let mut collector = DiagnosticCollector::default();
        let outcome = LineOutcome::Created {
            node: NodeKind::Section,
            id: "sec-b-s".to_string(),
        };
        collector.record(1, &LineKind::SectionHeading("S"), &outcome);
        collector.record(5, &LineKind::SectionHeading("S"), &outcome);

        let diagnostics = collector.finish();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 5);
        assert_eq!(
            diagnostics[0].reason,
            DiagnosticReason::DuplicateIdentifier("sec-b-s".to_string())
        );
    }

    #[test]
    fn test_collector_skips_repeated_part_ids() {
        let mut collector = DiagnosticCollector::default();
        let outcome = LineOutcome::Created {
            node: NodeKind::Part,
            id: "part-b-s-1".to_string(),
        };
        collector.record(4, &LineKind::PartDelimiter, &outcome);
        collector.record(9, &LineKind::PartDelimiter, &outcome);
        assert!(collector.finish().is_empty());
    }
}
