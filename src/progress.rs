//! Progress output for user-facing status updates.
//!
//! Fetch and export steps report here so the user sees activity while the
//! sequential API calls run. Warnings are non-fatal and the run continues.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    colors_enabled: bool,
}

/// Check if we should use colors in output
fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter writing to stderr
    pub fn new() -> Self {
        Self {
            writer: Box::new(io::stderr()),
            colors_enabled: should_use_colors(),
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            colors_enabled: false,
        }
    }

    pub fn connecting(&mut self) {
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", "Connecting to Fable...".dimmed());
        } else {
            let _ = writeln!(self.writer, "Connecting to Fable...");
        }
    }

    pub fn fetching_reviews(&mut self) {
        let _ = writeln!(self.writer, "Fetching your reviews and ratings...");
    }

    pub fn reviews_found(&mut self, count: usize) {
        if count > 0 {
            self.success(&format!("Found {} reviews with ratings", count));
        } else {
            let _ = writeln!(
                self.writer,
                "No reviews found (continuing with available data)"
            );
        }
    }

    pub fn books_found(&mut self, count: usize) {
        self.success(&format!("Found {} books", count));
    }

    pub fn lists_found(&mut self, count: usize) {
        self.success(&format!("Found {} book lists", count));
    }

    pub fn list_start(&mut self, name: &str, count: u64) {
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Fetching '{}' ({} books)...", name, count).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Fetching '{}' ({} books)...", name, count);
        }
    }

    pub fn list_empty(&mut self, name: &str) {
        let _ = writeln!(self.writer, "  List '{}' is empty", name);
    }

    pub fn list_exported(&mut self, name: &str, count: usize, formats: &[&str]) {
        self.success(&format!(
            "Exported {} books from '{}' ({})",
            count,
            name,
            formats.join(", ")
        ));
    }

    pub fn total_exported(&mut self, count: usize) {
        let _ = writeln!(self.writer);
        self.success(&format!("Total: {} books exported", count));
    }

    pub fn exported(&mut self, path: &Path) {
        self.success(&format!("Exported to {}", path.display()));
    }

    pub fn nothing_to_export(&mut self) {
        let _ = writeln!(self.writer, "No books to export.");
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    pub fn done(&mut self, output_dir: &Path) {
        let _ = writeln!(self.writer);
        self.success(&format!(
            "Your books have been saved to: {}",
            output_dir.display()
        ));
    }

    fn success(&mut self, message: &str) {
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "✓".green().bold(), message.green());
        } else {
            let _ = writeln!(self.writer, "✓ {}", message);
        }
    }
}
