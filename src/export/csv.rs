use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::book::normalize;

use super::format::{
    extract_isbn, format_count, format_date, format_number, join_authors, join_tags, yes_no,
};
use super::{ensure_exportable, ExportError};

/// Column headers, in the order StoryGraph's importer expects
const HEADERS: [&str; 28] = [
    "Title",
    "Subtitle",
    "Author(s)",
    "ISBN-10",
    "ISBN-13",
    "Publisher",
    "Pages",
    "Published Date",
    "Genres",
    "Moods",
    "Content Warnings",
    "Status",
    "Rating",
    "Characters Rating",
    "Plot Rating",
    "Writing Style Rating",
    "Setting Rating",
    "Review",
    "Review Summary - Liked",
    "Review Summary - Disliked",
    "Review Summary - Disagreed",
    "Attributes/Tags",
    "Emoji Reaction",
    "Contains Spoilers",
    "Did Not Finish",
    "Started Reading",
    "Finished Reading",
    "Date Added",
];

/// Export books to CSV, one row per book.
pub fn export_csv(books: &[Value], output_path: &Path) -> Result<PathBuf, ExportError> {
    ensure_exportable(books, output_path)?;

    let mut writer = ::csv::Writer::from_path(output_path)?;
    writer.write_record(HEADERS)?;

    for raw in books {
        if raw.is_null() {
            continue;
        }
        let book = normalize(raw);
        let (isbn10, isbn13) = extract_isbn(&book.isbn);

        let row: [String; 28] = [
            book.title.clone(),
            book.subtitle.clone(),
            join_authors(&book.authors),
            isbn10,
            isbn13,
            book.imprint.clone(),
            format_count(book.page_count),
            format_date(&book.published_date),
            join_tags(&book.genres),
            join_tags(&book.moods),
            join_tags(&book.content_warnings),
            book.status.clone(),
            format_number(book.rating),
            format_number(book.characters_rating),
            format_number(book.plot_rating),
            format_number(book.writing_style_rating),
            format_number(book.setting_rating),
            book.review.clone(),
            book.review_summary_liked.clone(),
            book.review_summary_disliked.clone(),
            book.review_summary_disagreed.clone(),
            join_tags(&book.attributes),
            book.emoji_reaction.clone(),
            yes_no(book.contains_spoilers).to_string(),
            yes_no(book.did_not_finish).to_string(),
            format_date(&book.started_reading_at),
            format_date(&book.finished_reading_at),
            format_date(book.date_added_raw()),
        ];
        writer.write_record(&row)?;
    }

    writer.flush().map_err(ExportError::Io)?;
    info!("Wrote CSV export to {}", output_path.display());
    Ok(output_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_export_csv_empty_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.csv");

        let result = export_csv(&[], &path);

        assert!(matches!(result, Err(ExportError::NoBooks)));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_csv_header_has_28_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.csv");

        export_csv(&[json!({"title": "Foo"})], &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows[0].len(), 28);
        assert_eq!(rows[0][0], "Title");
        assert_eq!(rows[0][27], "Date Added");
    }

    #[test]
    fn test_export_csv_merged_review_row() {
        // the merge output shape: review fields overlaid at the outer level
        let books = vec![json!({"id": "A", "title": "Foo", "rating": 4.5})];

        let dir = tempdir().unwrap();
        let path = dir.path().join("books.csv");
        export_csv(&books, &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Foo");
        assert_eq!(rows[1][12], "4.5");
    }

    #[test]
    fn test_export_csv_field_rendering() {
        let books = vec![json!({
            "book": {
                "title": "Bar",
                "isbn": "978-0-13-468599-1",
                "authors": [{"name": "Jane Doe"}, {"name": "John Roe"}],
                "genres": [{"name": "Fantasy"}, {"name": "Horror"}],
                "started_reading_at": "2023-05-01T12:00:00Z"
            },
            "contains_spoilers": true,
            "did_not_finish": false
        })];

        let dir = tempdir().unwrap();
        let path = dir.path().join("books.csv");
        export_csv(&books, &path).unwrap();

        let row = &read_rows(&path)[1];
        assert_eq!(row[2], "Jane Doe, John Roe");
        assert_eq!(row[3], ""); // ISBN-10 empty for a 13-digit ISBN
        assert_eq!(row[4], "9780134685991");
        assert_eq!(row[8], "Fantasy; Horror");
        assert_eq!(row[23], "Yes");
        assert_eq!(row[24], "No");
        assert_eq!(row[25], "2023-05-01");
    }

    #[test]
    fn test_merge_then_export_round_trip() {
        use crate::book::{merge_reviews, ReviewLookup};

        let mut fields = serde_json::Map::new();
        fields.insert("rating".to_string(), json!(4.5));
        let mut reviews = ReviewLookup::new();
        reviews.insert("A".to_string(), fields);

        let books = vec![json!({"id": "A", "title": "Foo"})];
        let merged = merge_reviews(&books, &reviews);

        let dir = tempdir().unwrap();
        let path = dir.path().join("books.csv");
        export_csv(&merged, &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Foo");
        assert_eq!(rows[1][12], "4.5");
    }

    #[test]
    fn test_export_csv_skips_null_entries() {
        let books = vec![Value::Null, json!({"title": "Only"})];

        let dir = tempdir().unwrap();
        let path = dir.path().join("books.csv");
        export_csv(&books, &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2); // header + one data row
        assert_eq!(rows[1][0], "Only");
    }
}
