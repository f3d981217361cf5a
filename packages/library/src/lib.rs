//! Psalmody library - Parse the liturgical text source into a browsable tree.
//!
//! The source is a plain-text document, authored by hand, in which `#`, `##`
//! and `###` headings open categories, books and sections, `---` starts a new
//! part, and markers such as `[EN]` or `[COP]` select the language of the
//! lines that follow. This crate turns that text into a [`Library`] and keeps
//! an offline copy of it.
//!
//! # Example
//!
//! ```
//! use psalmody_library::{parse, Language};
//!
//! let library = parse("# Agpeya\n## Prime\n### Opening\n[EN]\nO come, let us worship");
//! let book = library.book("book-agpeya-prime").unwrap();
//! assert_eq!(book.first_part_index("sec-prime-opening"), Some(0));
//! assert_eq!(book.parts().next().unwrap().paragraphs(Language::En).len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`types`]: Document model (Library, Category, Book, Section, Part)
//! - [`slug`]: Slug and identifier generation
//! - [`parser`]: Line-based parser and diagnostics
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retry
//! - [`remote`]: Remote document fetching
//! - [`store`]: Key-value stores and the offline library cache
//! - [`sync`]: Fetch, parse and cache with offline fallback
//! - [`export`]: YAML and JSON output
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod parser;
pub mod remote;
pub mod slug;
pub mod store;
pub mod sync;
pub mod types;

pub use parser::{parse, parse_with_diagnostics, Diagnostic, ParseOutput};
pub use sync::{load_offline, sync_library, SyncOutcome};

pub use error::{LibraryError, Result};
pub use types::{Book, Category, Language, Library, Part, PartKind, Section};
