mod csv;
mod format;
mod json;
mod markdown;

pub use self::csv::export_csv;
pub use format::{extract_isbn, format_date};
pub use json::export_json;
pub use markdown::export_markdown;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors from rendering or writing an export file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No books to export")]
    NoBooks,

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// Anything outside letters, digits, underscore, space, and dash
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w \-]").unwrap());

/// Sanitize a list name for use as a file stem.
pub fn sanitize_list_name(name: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(name, "_")
        .replace(' ', "_")
}

/// Refuse empty input before touching the filesystem, then make sure the
/// target's parent directory exists.
pub(crate) fn ensure_exportable(books: &[Value], path: &Path) -> Result<(), ExportError> {
    if books.is_empty() {
        return Err(ExportError::NoBooks);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}
