use chrono::Local;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::book::{normalize, NormalizedBook};

use super::format::{format_date, format_number, join_authors};
use super::{ensure_exportable, ExportError};

/// Canonical reading-status sections, in render order
const STATUS_ORDER: [&str; 3] = ["finished", "reading", "unread"];

fn status_label(status: &str) -> String {
    match status {
        "finished" => "Finished".to_string(),
        "reading" => "Currently Reading".to_string(),
        "unread" => "Want to Read".to_string(),
        "" => "Unknown".to_string(),
        other => title_case(other),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Export books as a Markdown document grouped by reading status.
///
/// The three canonical sections always render in fixed order; any other
/// status groups follow in first-seen order. Within a section the original
/// fetch order is preserved.
pub fn export_markdown(books: &[Value], output_path: &Path) -> Result<PathBuf, ExportError> {
    ensure_exportable(books, output_path)?;

    let mut groups: Vec<(String, Vec<NormalizedBook>)> = Vec::new();
    for raw in books {
        if raw.is_null() {
            continue;
        }
        let book = normalize(raw);
        match groups.iter_mut().find(|(status, _)| *status == book.status) {
            Some((_, list)) => list.push(book),
            None => groups.push((book.status.clone(), vec![book])),
        }
    }

    let mut doc = String::new();
    doc.push_str("# My Fable Book Library\n");
    doc.push_str(&format!(
        "Exported on: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push_str(&format!("Total books: {}\n", books.len()));
    doc.push_str("\n---\n");

    for status in STATUS_ORDER {
        if let Some((_, list)) = groups.iter().find(|(s, _)| s.as_str() == status) {
            render_section(&mut doc, status, list);
        }
    }
    for (status, list) in &groups {
        if !STATUS_ORDER.contains(&status.as_str()) {
            render_section(&mut doc, status, list);
        }
    }

    fs::write(output_path, doc)?;
    info!("Wrote Markdown export to {}", output_path.display());
    Ok(output_path.to_path_buf())
}

fn render_section(doc: &mut String, status: &str, books: &[NormalizedBook]) {
    doc.push_str(&format!(
        "\n## {} ({})\n",
        status_label(status),
        books.len()
    ));

    for book in books {
        render_book(doc, book);
    }
}

/// One book: heading plus labeled lines, omitting anything empty.
fn render_book(doc: &mut String, book: &NormalizedBook) {
    let title = if book.title.is_empty() {
        "Unknown"
    } else {
        &book.title
    };
    doc.push_str(&format!("### {}\n", title));

    if !book.subtitle.is_empty() {
        doc.push_str(&format!("*{}*\n\n", book.subtitle));
    }

    if !book.authors.is_empty() {
        doc.push_str(&format!("**Author(s):** {}\n", join_authors(&book.authors)));
    }

    if let Some(rating) = book.rating.filter(|r| *r != 0.0) {
        let emoji = if book.emoji_reaction.is_empty() {
            String::new()
        } else {
            format!(" {}", book.emoji_reaction)
        };
        doc.push_str(&format!(
            "**Rating:** {}/5{}\n",
            format_number(Some(rating)),
            emoji
        ));
    }

    if book.has_detailed_ratings() {
        doc.push_str("**Detailed Ratings:**\n");
        let aspects = [
            ("Characters", book.characters_rating),
            ("Plot", book.plot_rating),
            ("Writing Style", book.writing_style_rating),
            ("Setting", book.setting_rating),
        ];
        for (label, rating) in aspects {
            if let Some(value) = rating.filter(|r| *r != 0.0) {
                doc.push_str(&format!("- {}: {}/5\n", label, format_number(Some(value))));
            }
        }
    }

    if !book.genres.is_empty() {
        doc.push_str(&format!("**Genres:** {}\n", book.genres.join(", ")));
    }
    if !book.moods.is_empty() {
        doc.push_str(&format!("**Moods:** {}\n", book.moods.join(", ")));
    }
    if !book.attributes.is_empty() {
        doc.push_str(&format!("**Tags:** {}\n", book.attributes.join(", ")));
    }

    let started = format_date(&book.started_reading_at);
    let finished = format_date(&book.finished_reading_at);
    if !started.is_empty() || !finished.is_empty() {
        doc.push_str("**Read Dates:** ");
        if !started.is_empty() {
            doc.push_str(&format!("Started {}", started));
        }
        if !finished.is_empty() {
            if !started.is_empty() {
                doc.push_str(&format!(" → Finished {}", finished));
            } else {
                doc.push_str(&format!("Finished {}", finished));
            }
        }
        doc.push('\n');
    }

    if !book.review.is_empty() {
        doc.push_str(&format!("\n**Review:**\n\n{}\n", book.review));
    }

    doc.push_str("\n---\n");
}
