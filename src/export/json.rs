use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::book::{normalize, NormalizedBook};

use super::format::{extract_isbn, format_date, join_authors};
use super::{ensure_exportable, ExportError};

/// Stable machine-readable shape for one exported book
#[derive(Serialize)]
struct BookJson {
    title: Option<String>,
    subtitle: String,
    authors: String,
    isbn10: String,
    isbn13: String,
    publisher: Option<String>,
    pages: Option<i64>,
    published_date: String,
    description: String,
    cover_image: String,
    genres: Vec<String>,
    moods: Vec<String>,
    content_warnings: Vec<String>,
    status: Option<String>,
    rating: Option<f64>,
    detailed_ratings: DetailedRatings,
    review: String,
    review_summary: ReviewSummary,
    contains_spoilers: Option<bool>,
    did_not_finish: Option<bool>,
    attributes: Vec<String>,
    emoji_reaction: String,
    spicy_level: Option<f64>,
    started_reading: String,
    finished_reading: String,
    current_page: Option<i64>,
    total_pages: Option<i64>,
    date_added: String,
}

#[derive(Serialize)]
struct DetailedRatings {
    characters: Option<f64>,
    plot: Option<f64>,
    writing_style: Option<f64>,
    setting: Option<f64>,
}

#[derive(Serialize)]
struct ReviewSummary {
    liked: String,
    disliked: String,
    disagreed: String,
}

fn opt(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl From<NormalizedBook> for BookJson {
    fn from(book: NormalizedBook) -> Self {
        let (isbn10, isbn13) = extract_isbn(&book.isbn);
        let date_added = format_date(book.date_added_raw());

        BookJson {
            title: opt(book.title),
            subtitle: book.subtitle,
            authors: join_authors(&book.authors),
            isbn10,
            isbn13,
            publisher: opt(book.imprint),
            pages: book.page_count,
            published_date: format_date(&book.published_date),
            description: book.description,
            cover_image: book.cover_image,
            genres: book.genres,
            moods: book.moods,
            content_warnings: book.content_warnings,
            status: opt(book.status),
            rating: book.rating,
            detailed_ratings: DetailedRatings {
                characters: book.characters_rating,
                plot: book.plot_rating,
                writing_style: book.writing_style_rating,
                setting: book.setting_rating,
            },
            review: book.review,
            review_summary: ReviewSummary {
                liked: book.review_summary_liked,
                disliked: book.review_summary_disliked,
                disagreed: book.review_summary_disagreed,
            },
            contains_spoilers: book.contains_spoilers,
            did_not_finish: book.did_not_finish,
            attributes: book.attributes,
            emoji_reaction: book.emoji_reaction,
            spicy_level: book.spicy_level,
            started_reading: format_date(&book.started_reading_at),
            finished_reading: format_date(&book.finished_reading_at),
            current_page: book.current_page,
            total_pages: book.total_pages,
            date_added,
        }
    }
}

/// Export books as a pretty-printed JSON array with stable field names.
pub fn export_json(books: &[Value], output_path: &Path) -> Result<PathBuf, ExportError> {
    ensure_exportable(books, output_path)?;

    let records: Vec<BookJson> = books
        .iter()
        .filter(|raw| !raw.is_null())
        .map(|raw| BookJson::from(normalize(raw)))
        .collect();

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;

    info!("Wrote JSON export to {}", output_path.display());
    Ok(output_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn export_and_parse(books: &[Value]) -> Value {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");
        export_json(books, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_export_json_empty_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");

        let result = export_json(&[], &path);

        assert!(matches!(result, Err(ExportError::NoBooks)));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_json_shape() {
        let parsed = export_and_parse(&[json!({
            "book": {
                "title": "Foo",
                "isbn": "978-0-13-468599-1",
                "authors": [{"name": "Jane Doe"}]
            },
            "rating": 4.5,
            "characters_rating": 4,
            "status": "finished"
        })]);

        let entry = &parsed[0];
        assert_eq!(entry["title"], json!("Foo"));
        assert_eq!(entry["authors"], json!("Jane Doe"));
        assert_eq!(entry["isbn13"], json!("9780134685991"));
        assert_eq!(entry["rating"], json!(4.5));
        assert_eq!(entry["status"], json!("finished"));
        assert_eq!(entry["detailed_ratings"]["characters"], json!(4.0));
        assert_eq!(entry["detailed_ratings"]["plot"], Value::Null);
        assert_eq!(entry["review_summary"]["liked"], json!(""));
    }

    #[test]
    fn test_export_json_absent_values_are_null() {
        let parsed = export_and_parse(&[json!({})]);

        let entry = &parsed[0];
        assert_eq!(entry["title"], Value::Null);
        assert_eq!(entry["publisher"], Value::Null);
        assert_eq!(entry["status"], Value::Null);
        assert_eq!(entry["rating"], Value::Null);
        assert_eq!(entry["contains_spoilers"], Value::Null);
        assert_eq!(entry["genres"], json!([]));
        assert_eq!(entry["review"], json!(""));
    }

    #[test]
    fn test_export_json_preserves_non_ascii() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");

        export_json(&[json!({"title": "Cien años de soledad", "emoji_reaction": "🔥"})], &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Cien años de soledad"));
        assert!(content.contains("🔥"));
    }

    #[test]
    fn test_export_json_skips_null_entries() {
        let parsed = export_and_parse(&[Value::Null, json!({"title": "Only"})]);
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }
}
