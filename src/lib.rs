pub mod aggregate;
pub mod api;
pub mod book;
pub mod cli;
pub mod error;
pub mod export;
pub mod logging;
pub mod progress;

pub use api::{config_from_env, ApiConfig, ApiError, BookList, FableClient};
pub use book::{merge_reviews, normalize, record_id, NormalizedBook, ReviewLookup};
pub use error::{AppError, ExitCode};
pub use export::{
    export_csv, export_json, export_markdown, extract_isbn, format_date, sanitize_list_name,
    ExportError,
};
