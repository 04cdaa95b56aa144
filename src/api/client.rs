use reqwest::blocking::{Client, Response};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERER,
};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::book::ReviewLookup;

use super::types::{ApiConfig, ApiError, BookList};
use super::{ENV_FABLE_AUTH_TOKEN, ENV_FABLE_USER_ID};

const API_BASE_URL: &str = "https://api.fable.co";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const LIST_BOOKS_PAGE_SIZE: usize = 100;
const REVIEWS_PAGE_SIZE: usize = 20;

/// Review fields copied into the lookup, keyed by book id. Missing fields
/// are stored as null so a later merge overlays a uniform key set.
const REVIEW_FIELDS: [&str; 14] = [
    "rating",
    "review",
    "contains_spoilers",
    "did_not_finish",
    "characters_rating",
    "plot_rating",
    "writing_style_rating",
    "setting_rating",
    "attributes",
    "emoji_reaction",
    "emoji",
    "spicy_level",
    "created_at",
    "updated_at",
];

/// One page of results. `next` is only populated by the `{results, next}`
/// envelope; bare-array responses are final.
struct Page {
    results: Vec<Value>,
    next: Option<String>,
    bare: bool,
}

fn parse_page(data: Value, operation: &str) -> Result<Page, ApiError> {
    match data {
        Value::Array(items) => Ok(Page {
            results: items,
            next: None,
            bare: true,
        }),
        Value::Object(mut map) => {
            let results = match map.remove("results") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            let next = map
                .get("next")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            Ok(Page {
                results,
                next,
                bare: false,
            })
        }
        _ => Err(ApiError::UnexpectedFormat {
            operation: operation.to_string(),
        }),
    }
}

/// Blocking client for the Fable HTTPS JSON API
pub struct FableClient {
    client: Client,
    config: ApiConfig,
}

impl FableClient {
    /// Create a new client. Fails before any network activity when a
    /// credential is missing.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.user_id.is_empty() {
            return Err(ApiError::MissingCredentials(ENV_FABLE_USER_ID));
        }
        if config.auth_token.is_empty() {
            return Err(ApiError::MissingCredentials(ENV_FABLE_AUTH_TOKEN));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, HeaderValue::from_static("https://fable.co/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://fable.co"));

        // The API expects the JWT scheme regardless of what the user pasted
        let authorization = format!("JWT {}", config.bare_token());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization)
                .map_err(|e| ApiError::Network(e.to_string()))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch all owned/read books, following the server-supplied `next`
    /// cursor until exhausted.
    pub fn fetch_owned_books(&self) -> Result<Vec<Value>, ApiError> {
        let operation = "owned books";
        let mut all_books = Vec::new();
        let mut url = format!("{}/api/v2/books/owned/?include=preorder,owned", API_BASE_URL);

        loop {
            let data = self.get_json(&url, operation)?;
            let page = parse_page(data, operation)?;
            all_books.extend(page.results);

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        info!("Fetched {} owned books", all_books.len());
        Ok(all_books)
    }

    /// Fetch the catalog of the user's book lists (system and custom).
    pub fn fetch_user_lists(&self) -> Result<Vec<BookList>, ApiError> {
        let operation = "book lists";
        let url = format!(
            "{}/api/v2/users/{}/book_lists",
            API_BASE_URL, self.config.user_id
        );

        let data = self.get_json(&url, operation)?;
        let page = parse_page(data, operation)?;

        let lists: Vec<BookList> = page.results.iter().filter_map(BookList::from_value).collect();
        info!("Found {} book lists", lists.len());
        Ok(lists)
    }

    /// Fetch all books from a specific list via offset/limit pagination.
    /// Stops on a short page; a bare-array response is a single final page.
    pub fn fetch_books_from_list(&self, list_id: &str) -> Result<Vec<Value>, ApiError> {
        let operation = format!("books from list {}", list_id);
        let mut all_books = Vec::new();
        let mut offset = 0;

        loop {
            let url = format!(
                "{}/api/v2/users/{}/book_lists/{}/books?offset={}&limit={}",
                API_BASE_URL, self.config.user_id, list_id, offset, LIST_BOOKS_PAGE_SIZE
            );

            let data = self.get_json(&url, &operation)?;
            let page = parse_page(data, &operation)?;
            let fetched = page.results.len();
            all_books.extend(page.results);

            if page.bare || fetched < LIST_BOOKS_PAGE_SIZE {
                break;
            }
            offset += LIST_BOOKS_PAGE_SIZE;
        }

        debug!("Fetched {} books from list {}", all_books.len(), list_id);
        Ok(all_books)
    }

    /// Fetch the user's full review history, keyed by book id.
    ///
    /// A missing review history must not block book export, so this never
    /// fails: any transport or HTTP error returns whatever was accumulated.
    pub fn fetch_user_reviews(&self) -> ReviewLookup {
        let mut reviews = ReviewLookup::new();
        let mut offset = 0;

        loop {
            let response = match self.get_reviews_page(offset) {
                Ok(response) => response,
                Err(e) => {
                    debug!("Review fetch stopped at offset {}: {}", offset, e);
                    return reviews;
                }
            };

            let data: Value = match response.json() {
                Ok(data) => data,
                Err(e) => {
                    warn!("Could not decode reviews page: {}", e);
                    return reviews;
                }
            };

            if !data.is_object() {
                return reviews;
            }

            let page = match parse_page(data, "reviews") {
                Ok(page) => page,
                Err(_) => return reviews,
            };

            if page.results.is_empty() {
                break;
            }

            let fetched = page.results.len();
            for review in &page.results {
                index_review(&mut reviews, review);
            }

            if fetched < REVIEWS_PAGE_SIZE {
                break;
            }
            offset += REVIEWS_PAGE_SIZE;
        }

        info!("Collected {} reviews", reviews.len());
        reviews
    }

    /// GET one reviews page, falling back to the legacy unversioned path
    /// when the v2 endpoint responds 404.
    fn get_reviews_page(&self, offset: usize) -> Result<Response, ApiError> {
        let operation = "reviews";
        let url = format!(
            "{}/api/v2/users/{}/reviews/?limit={}&offset={}",
            API_BASE_URL, self.config.user_id, REVIEWS_PAGE_SIZE, offset
        );

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ApiError::request(operation, e))?;

        let response = if response.status() == StatusCode::NOT_FOUND {
            debug!("v2 reviews endpoint returned 404, retrying legacy path");
            let legacy = format!(
                "{}/api/users/{}/reviews/?limit={}&offset={}",
                API_BASE_URL, self.config.user_id, REVIEWS_PAGE_SIZE, offset
            );
            self.client
                .get(&legacy)
                .send()
                .map_err(|e| ApiError::request(operation, e))?
        } else {
            response
        };

        response
            .error_for_status()
            .map_err(|e| ApiError::request(operation, e))
    }

    fn get_json(&self, url: &str, operation: &str) -> Result<Value, ApiError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ApiError::request(operation, e))?
            .error_for_status()
            .map_err(|e| ApiError::request(operation, e))?;

        response.json().map_err(|e| ApiError::request(operation, e))
    }
}

/// Index one raw review record under its book id. Reviews without an
/// identifiable book are skipped.
fn index_review(reviews: &mut ReviewLookup, review: &Value) {
    let book_id = match review.get("book").and_then(|b| b.get("id")) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return,
    };

    let mut entry = serde_json::Map::new();
    for key in REVIEW_FIELDS {
        let value = match key {
            // attributes degrade to an empty list rather than null
            "attributes" => review
                .get(key)
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            _ => review.get(key).cloned().unwrap_or(Value::Null),
        };
        entry.insert(key.to_string(), value);
    }

    reviews.insert(book_id, entry);
}
