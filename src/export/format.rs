use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Render a date-like string as `YYYY-MM-DD`, or empty when it does not
/// parse. Accepts RFC 3339 timestamps (trailing `Z` included), offset-less
/// timestamps, and bare dates.
pub fn format_date(date_str: &str) -> String {
    if date_str.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    String::new()
}

/// Split a raw ISBN into `(isbn10, isbn13)` by normalized length. An
/// unrecognized length lands in the ISBN-10 slot unguessed.
pub fn extract_isbn(isbn: &str) -> (String, String) {
    if isbn.is_empty() {
        return (String::new(), String::new());
    }

    let normalized: String = isbn.chars().filter(|c| *c != '-').collect();

    if normalized.len() == 13 {
        return (String::new(), normalized);
    }
    (normalized, String::new())
}

pub fn join_authors(authors: &[String]) -> String {
    authors.join(", ")
}

pub fn join_tags(values: &[String]) -> String {
    values.join("; ")
}

pub fn yes_no(value: Option<bool>) -> &'static str {
    if value.unwrap_or(false) {
        "Yes"
    } else {
        "No"
    }
}

pub fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn format_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
