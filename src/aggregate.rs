use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::api::FableClient;
use crate::book::{merge_reviews, ReviewLookup};
use crate::cli::ExportFormat;
use crate::error::AppError;
use crate::export::{
    export_csv, export_json, export_markdown, sanitize_list_name, ExportError,
};
use crate::progress::Progress;

/// Fetch owned books plus the contents of every list, tolerating partial
/// failure: each failing source is reported and skipped. Duplicates across
/// owned books and lists are preserved.
pub fn fetch_all_books(client: &FableClient, progress: &mut Progress) -> Vec<Value> {
    let mut all_books = Vec::new();

    match client.fetch_owned_books() {
        Ok(books) => all_books.extend(books),
        Err(e) => {
            warn!("Could not fetch owned books: {}", e);
            progress.warn(&format!("Could not fetch owned books: {}", e));
        }
    }

    match client.fetch_user_lists() {
        Ok(lists) => {
            for list in lists {
                match client.fetch_books_from_list(&list.id) {
                    Ok(books) => all_books.extend(books),
                    Err(e) => {
                        warn!("Could not fetch books from list {}: {}", list.id, e);
                        progress.warn(&format!(
                            "Could not fetch books from list '{}': {}",
                            list.name, e
                        ));
                    }
                }
            }
        }
        Err(e) => {
            warn!("Could not fetch user lists: {}", e);
            progress.warn(&format!("Could not fetch book lists: {}", e));
        }
    }

    all_books
}

/// Export the whole library as one combined file per requested format.
pub fn run_combined_export(
    client: &FableClient,
    output_dir: &Path,
    formats: &[ExportFormat],
    progress: &mut Progress,
) -> Result<(), AppError> {
    let reviews = fetch_reviews(client, progress);

    let books = fetch_all_books(client, progress);
    let books = merge_reviews(&books, &reviews);
    progress.books_found(books.len());

    if books.is_empty() {
        progress.nothing_to_export();
        return Ok(());
    }

    for format in formats {
        let path = output_dir.join(format.file_name("fable_books"));
        match export_one(*format, &books, &path) {
            Ok(path) => progress.exported(&path),
            Err(e) => {
                warn!("Export to {} failed: {}", format, e);
                progress.warn(&format!("Error exporting {}: {}", format.label(), e));
            }
        }
    }

    Ok(())
}

/// Export every list to its own file set. A list that cannot be fetched is
/// skipped; an unreachable list catalog aborts the run.
pub fn run_per_list_export(
    client: &FableClient,
    output_dir: &Path,
    formats: &[ExportFormat],
    progress: &mut Progress,
) -> Result<(), AppError> {
    let reviews = fetch_reviews(client, progress);

    let lists = client.fetch_user_lists()?;
    progress.lists_found(lists.len());

    let mut total_books = 0usize;
    for list in &lists {
        progress.list_start(&list.name, list.count);

        let raw = match client.fetch_books_from_list(&list.id) {
            Ok(books) => books,
            Err(e) => {
                warn!("Could not fetch books from list {}: {}", list.id, e);
                progress.warn(&format!(
                    "Could not fetch books from list '{}': {}",
                    list.name, e
                ));
                continue;
            }
        };

        let books = merge_reviews(&raw, &reviews);
        if books.is_empty() {
            progress.list_empty(&list.name);
            continue;
        }

        let stem = sanitize_list_name(&list.name);
        let mut exported = Vec::new();
        for format in formats {
            let path = output_dir.join(format.file_name(&stem));
            match export_one(*format, &books, &path) {
                Ok(_) => exported.push(format.label()),
                Err(e) => {
                    warn!("Export of list {} to {} failed: {}", list.id, format, e);
                    progress.warn(&format!(
                        "Error exporting {} for '{}': {}",
                        format.label(),
                        list.name,
                        e
                    ));
                }
            }
        }

        if !exported.is_empty() {
            progress.list_exported(&list.name, books.len(), &exported);
            total_books += books.len();
        }
    }

    progress.total_exported(total_books);
    Ok(())
}

fn fetch_reviews(client: &FableClient, progress: &mut Progress) -> ReviewLookup {
    progress.fetching_reviews();
    let reviews = client.fetch_user_reviews();
    info!("Merged review lookup holds {} entries", reviews.len());
    progress.reviews_found(reviews.len());
    reviews
}

fn export_one(
    format: ExportFormat,
    books: &[Value],
    path: &Path,
) -> Result<PathBuf, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(books, path),
        ExportFormat::Json => export_json(books, path),
        ExportFormat::Md => export_markdown(books, path),
    }
}
