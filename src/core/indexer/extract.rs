//! Document text extraction.
//!
//! PDFs are read through `pdf-extract`; plain-text formats are read
//! as UTF-8. Extracted text is normalized before chunking so that
//! paragraph breaks survive as `"\n\n"` and nothing else does.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::core::error::{DocragError, Result};
use crate::core::types::{SourceKey, SourceMetadata};

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HORIZONTAL_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]{2,}").unwrap());

/// Turns a document file into raw text
pub trait TextExtractor: Send + Sync {
    /// Extract the text of `path`.
    ///
    /// Returns `ExtractionFailed` when the file cannot be read or
    /// decoded. An empty string is a valid result; callers decide
    /// whether empty text is an error.
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Extractor dispatching on file extension
#[derive(Debug, Default, Clone)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pdf(path: &Path) -> Result<String> {
        // pdf-extract panics on some malformed inputs
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(DocragError::ExtractionFailed(format!(
                "{}: {e}",
                path.display()
            ))),
            Err(_) => Err(DocragError::ExtractionFailed(format!(
                "{}: malformed PDF",
                path.display()
            ))),
        }
    }

    fn extract_plain(path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| {
            DocragError::ExtractionFailed(format!("{}: {e}", path.display()))
        })?;

        String::from_utf8(bytes).map_err(|_| {
            DocragError::ExtractionFailed(format!("{}: not valid UTF-8 text", path.display()))
        })
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(DocragError::ExtractionFailed(format!(
                "File not found: {}",
                path.display()
            )));
        }

        match extension_of(path).as_str() {
            "pdf" => Self::extract_pdf(path),
            _ => Self::extract_plain(path),
        }
    }
}

/// Lowercased extension without the dot, empty when absent
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Normalize extracted text.
///
/// CRLF and CR become LF, trailing spaces are removed from each
/// line, runs of spaces and tabs collapse to one space, runs of three
/// or more newlines collapse to a paragraph break, and the result is
/// trimmed.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let trimmed_lines: Vec<&str> = unified.split('\n').map(str::trim_end).collect();
    let joined = trimmed_lines.join("\n");
    let spaced = HORIZONTAL_RUNS.replace_all(&joined, " ");

    EXCESS_NEWLINES
        .replace_all(&spaced, "\n\n")
        .trim()
        .to_string()
}

/// Build provenance for a document about to be indexed
pub fn describe(path: &Path) -> Result<SourceMetadata> {
    let metadata = fs::metadata(path)
        .map_err(|e| DocragError::ExtractionFailed(format!("{}: {e}", path.display())))?;

    Ok(SourceMetadata {
        source: SourceKey::from_path(path),
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension: extension_of(path),
        file_size: metadata.len(),
        indexed_at: chrono::Utc::now().to_rfc3339(),
    })
}
