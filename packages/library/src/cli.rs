//! Command-line interface.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use textwrap::{fill, Options};

use crate::config::{AppConfig, TEXT_WRAP_WIDTH};
use crate::error::{LibraryError, Result};
use crate::export::{render, save_export, ExportFormat};
use crate::http::bytes_to_string;
use crate::parser::{parse_with_diagnostics, Diagnostic};
use crate::remote::RemoteSource;
use crate::store::{FileStore, LibraryCache};
use crate::sync::{load_offline, sync_library, SyncOutcome};
use crate::types::{Book, Language, Library};

/// Psalmody - Parse and browse the multilingual liturgical library.
#[derive(Parser)]
#[command(name = "psalmody")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for the `parse` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tree of titles and identifiers.
    Summary,
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a local source file.
    Parse {
        /// Path to the plain-text source
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Write YAML/JSON output to this file instead of stdout (not with
        /// `--format summary`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// List lines that were skipped
        #[arg(long)]
        diagnostics: bool,
    },

    /// Fetch the remote document, parse it and refresh the offline cache.
    Sync {
        /// Remote document ID (default: $PSALMODY_DOC_ID)
        doc_id: Option<String>,

        /// Cache directory (default: $PSALMODY_CACHE_DIR or .psalmody-cache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Base URL of the document service
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show the cached library, or the text of one book.
    Show {
        /// Cache directory (default: $PSALMODY_CACHE_DIR or .psalmody-cache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Book identifier to print in reading order
        #[arg(short, long)]
        book: Option<String>,
    },
}

/// Run the CLI.
///
/// The environment is only read by the commands that use it, after their
/// flags have been applied.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            file,
            format,
            output,
            diagnostics,
        } => parse_command(&file, format, output.as_deref(), diagnostics),
        Commands::Sync {
            doc_id,
            cache_dir,
            base_url,
        } => {
            let mut config = AppConfig::from_env();
            if let Some(dir) = cache_dir {
                config = config.with_cache_dir(dir);
            }
            if let Some(url) = base_url {
                config = config.with_remote_base_url(url);
            }
            if let Some(id) = doc_id {
                config = config.with_doc_id(id);
            }
            config.validate()?;
            sync_command(&config)
        }
        Commands::Show { cache_dir, book } => {
            let config = match cache_dir {
                Some(dir) => AppConfig::from_env().with_cache_dir(dir),
                None => AppConfig::from_env(),
            };
            show_command(&config, book.as_deref())
        }
    }
}

/// Execute the parse command.
fn parse_command(
    file: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    show_diagnostics: bool,
) -> Result<()> {
    if format == OutputFormat::Summary && output.is_some() {
        return Err(LibraryError::Config(
            "--output needs --format yaml or --format json".to_string(),
        ));
    }

    let bytes = std::fs::read(file)?;
    let raw = bytes_to_string(&bytes, &file.display().to_string());
    let parsed = parse_with_diagnostics(&raw);

    let export_format = match format {
        OutputFormat::Summary => None,
        OutputFormat::Yaml => Some(ExportFormat::Yaml),
        OutputFormat::Json => Some(ExportFormat::Json),
    };

    match (export_format, output) {
        (None, _) => print_summary(&parsed.library),
        (Some(format), Some(path)) => {
            save_export(&parsed.library, format, path)?;
            println!(
                "{} {}",
                style("Saved to:").green().bold(),
                path.display()
            );
        }
        (Some(format), None) => print!("{}", render(&parsed.library, format)?),
    }

    if show_diagnostics {
        print_diagnostics(&parsed.diagnostics);
    } else if !parsed.diagnostics.is_empty() {
        eprintln!(
            "  Skipped lines: {} (use --diagnostics to list them)",
            style(parsed.diagnostics.len()).yellow().bold()
        );
    }

    Ok(())
}

/// Execute the sync command.
fn sync_command(config: &AppConfig) -> Result<()> {
    let doc_id = config.doc_id.as_deref().ok_or_else(|| {
        LibraryError::Config("no document ID given (argument or PSALMODY_DOC_ID)".to_string())
    })?;

    println!(
        "{} {} from {}",
        style("Syncing").bold(),
        style(doc_id).cyan(),
        style(&config.remote_base_url).green()
    );

    let cache = LibraryCache::new(FileStore::new(&config.cache_dir));
    let source = RemoteSource::new(config.remote_base_url.clone())?;

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Fetching document...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = sync_library(&cache, &source, doc_id);
    pb.finish_and_clear();

    match outcome {
        SyncOutcome::Fresh {
            library,
            diagnostics,
        } => {
            print_stats(&library);
            if !diagnostics.is_empty() {
                println!("  Skipped lines: {}", style(diagnostics.len()).yellow().bold());
            }
            println!(
                "{} {}",
                style("Cached in:").green().bold(),
                config.cache_dir.display()
            );
            Ok(())
        }
        SyncOutcome::Cached { library, error } => {
            eprintln!(
                "{} {error}",
                style("Fetch failed, using cached copy:").yellow().bold()
            );
            print_stats(&library);
            Ok(())
        }
        SyncOutcome::Empty { error } => Err(error),
    }
}

/// Execute the show command.
fn show_command(config: &AppConfig, book_id: Option<&str>) -> Result<()> {
    let cache = LibraryCache::new(FileStore::new(&config.cache_dir));
    let library = load_offline(&cache);

    match book_id {
        Some(id) => {
            let book = library
                .book(id)
                .ok_or_else(|| LibraryError::BookNotFound(id.to_string()))?;
            print_book(book);
        }
        None => {
            if library.is_empty() {
                println!("Cache is empty. Run `psalmody sync` first.");
            } else {
                if let Some(cached) = cache.load_cached() {
                    println!(
                        "  Saved: {}",
                        style(cached.saved_at.format("%Y-%m-%d %H:%M UTC")).green()
                    );
                }
                print_summary(&library);
            }
        }
    }
    Ok(())
}

fn print_stats(library: &Library) {
    let stats = library.stats();
    println!("  Categories: {}", stats.categories);
    println!("  Books: {}", stats.books);
    println!("  Sections: {}", stats.sections);
    println!("  Parts: {}", stats.parts);
}

fn print_summary(library: &Library) {
    for category in &library.categories {
        println!("{} {}", style(&category.title).bold(), style(&category.id).dim());
        for book in &category.books {
            println!("  {} {}", style(&book.title).cyan(), style(&book.id).dim());
            for section in &book.sections {
                println!(
                    "    {} {} ({} parts)",
                    section.title,
                    style(&section.id).dim(),
                    section.parts.len()
                );
            }
        }
    }
    print_stats(library);
}

fn print_book(book: &Book) {
    println!("{}", style(&book.title).bold());
    let options = Options::new(TEXT_WRAP_WIDTH)
        .initial_indent("    ")
        .subsequent_indent("    ");

    for section in &book.sections {
        println!();
        println!("{}", style(&section.title).cyan().bold());
        for part in &section.parts {
            for language in Language::ALL {
                for paragraph in part.paragraphs(language) {
                    println!("  {}", style(language.marker()).dim());
                    println!("{}", fill(paragraph, &options));
                }
            }
        }
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("{}", style("Skipped lines:").yellow().bold());
    for diagnostic in diagnostics {
        eprintln!("  {diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_parse_command() {
        let cli = Cli::parse_from(["psalmody", "parse", "agpeya.txt"]);

        let Commands::Parse {
            file,
            format,
            output,
            diagnostics,
        } = cli.command
        else {
            panic!("expected parse command");
        };
        assert_eq!(file, PathBuf::from("agpeya.txt"));
        assert_eq!(format, OutputFormat::Summary);
        assert!(output.is_none());
        assert!(!diagnostics);
    }

    #[test]
    fn test_cli_parse_parse_with_format() {
        let cli = Cli::parse_from([
            "psalmody",
            "parse",
            "agpeya.txt",
            "--format",
            "json",
            "--diagnostics",
        ]);

        let Commands::Parse {
            format,
            diagnostics,
            ..
        } = cli.command
        else {
            panic!("expected parse command");
        };
        assert_eq!(format, OutputFormat::Json);
        assert!(diagnostics);
    }

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from([
            "psalmody",
            "sync",
            "0123456789abc",
            "--cache-dir",
            "/tmp/cache",
        ]);

        let Commands::Sync {
            doc_id,
            cache_dir,
            base_url,
        } = cli.command
        else {
            panic!("expected sync command");
        };
        assert_eq!(doc_id.as_deref(), Some("0123456789abc"));
        assert_eq!(cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert!(base_url.is_none());
    }

    #[test]
    fn test_cli_parse_show_book() {
        let cli = Cli::parse_from(["psalmody", "show", "--book", "book-agpeya-prime"]);
        let Commands::Show { book, .. } = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(book.as_deref(), Some("book-agpeya-prime"));
    }
}
