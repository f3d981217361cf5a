//! YAML and JSON export of a parsed library.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::types::Library;

/// Serialization format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Yaml,
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Indent YAML sequences under their parent key.
///
/// The serializer places sequence items (`- `) at the same indent as their
/// parent key; yamllint's `indent-sequences: true` wants them nested:
///
/// ```yaml
/// # Before:          # After:
/// books:             books:
/// - id: book-a         - id: book-a
///   title: A             title: A
/// ```
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    // Stack of indent levels where sequences start
    let mut seq_indents: Vec<usize> = Vec::new();

    for line in yaml.lines() {
        let trimmed = line.trim_start();

        // Blank lines pass through
        if trimmed.is_empty() {
            result.push(line.to_string());
            continue;
        }

        let indent = line.len() - trimmed.len();

        // Leave every sequence we have dedented out of, or whose indent we
        // are back at without a new `- ` item
        while let Some(&seq_indent) = seq_indents.last() {
            if indent < seq_indent || (indent == seq_indent && !trimmed.starts_with("- ")) {
                seq_indents.pop();
            } else {
                break;
            }
        }

        // A `- ` at a new indent opens a nested sequence
        if trimmed.starts_with("- ") {
            let is_continuation = seq_indents.last().is_some_and(|&si| si == indent);
            if !is_continuation {
                seq_indents.push(indent);
            }
        }

        // Two extra spaces per open sequence
        let extra = seq_indents.len() * 2;
        if extra > 0 {
            result.push(format!("{}{}", " ".repeat(indent + extra), trimmed));
        } else {
            result.push(line.to_string());
        }
    }

    result.join("\n")
}

/// Render a library as YAML with a document start marker.
pub fn to_yaml(library: &Library) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(library)?;
    let yaml = indent_yaml_sequences(&yaml);
    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Render a library as pretty-printed JSON.
pub fn to_json(library: &Library) -> Result<String> {
    let mut json = serde_json::to_string_pretty(library)?;
    json.push('\n');
    Ok(json)
}

/// Render a library in `format`.
pub fn render(library: &Library, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Yaml => to_yaml(library),
        ExportFormat::Json => to_json(library),
    }
}

/// Write an export to `path`.
///
/// Writes to a temp file next to `path`, syncs it, then renames it into
/// place so a crash never leaves a half-written export.
pub fn save_export(library: &Library, format: ExportFormat, path: &Path) -> Result<()> {
    let content = render(library, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("library.{}", format.extension()));
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}
