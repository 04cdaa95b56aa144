use serde_json::Value;

use super::types::NormalizedBook;

type JsonMap = serde_json::Map<String, Value>;

/// Normalize one raw record into the canonical flat form.
///
/// `raw` may be anything the API returned: null, a bare book object, or a
/// list entry wrapping the real book payload under a `book` key with review
/// fields merged at the outer level. Non-object input yields an all-default
/// record; this function never fails.
pub fn normalize(raw: &Value) -> NormalizedBook {
    let Some(outer) = raw.as_object() else {
        return NormalizedBook::default();
    };

    // List entries nest the book payload one level down; review and
    // reading-state fields stay on the outer record.
    let inner = match outer.get("book") {
        Some(Value::Object(map)) => map,
        _ => outer,
    };

    let storygraph_tags = sub_object(inner, "storygraph_tags");
    let review_summary = sub_object(inner, "review_summary");
    let reading_progress = sub_object(inner, "reading_progress");

    NormalizedBook {
        title: first_string(&[inner.get("title"), outer.get("title")]),
        subtitle: string_at(inner, "subtitle"),
        authors: name_list(inner.get("authors").or_else(|| outer.get("authors"))),
        isbn: first_string(&[inner.get("isbn"), outer.get("isbn")]),

        imprint: first_string(&[
            inner.get("publisher"),
            inner.get("imprint"),
            outer.get("publisher"),
        ]),
        page_count: first_integer(&[
            inner.get("page_count"),
            inner.get("pages"),
            outer.get("page_count"),
        ]),
        published_date: first_string(&[
            inner.get("published_date"),
            inner.get("publish_date"),
            outer.get("published_date"),
        ]),
        description: string_at(inner, "description"),
        cover_image: string_at(inner, "cover_image"),

        genres: name_list(inner.get("genres")),
        storygraph_genres: name_list(storygraph_tags.and_then(|t| t.get("genres"))),
        moods: name_list(storygraph_tags.and_then(|t| t.get("moods"))),
        content_warnings: name_list(storygraph_tags.and_then(|t| t.get("content_warnings"))),
        attributes: name_list(outer.get("attributes")),

        status: first_string(&[
            reading_progress.and_then(|p| p.get("status")),
            outer.get("status"),
        ]),
        current_page: first_integer(&[reading_progress.and_then(|p| p.get("current_page"))]),
        total_pages: first_integer(&[reading_progress.and_then(|p| p.get("page_count"))]),
        started_reading_at: string_at(inner, "started_reading_at"),
        finished_reading_at: string_at(inner, "finished_reading_at"),
        added_at: string_at(outer, "added_at"),

        rating: number_at(outer, "rating"),
        characters_rating: number_at(outer, "characters_rating"),
        plot_rating: number_at(outer, "plot_rating"),
        writing_style_rating: number_at(outer, "writing_style_rating"),
        setting_rating: number_at(outer, "setting_rating"),
        review: string_at(outer, "review"),
        review_summary_liked: first_string(&[review_summary.and_then(|s| s.get("liked"))]),
        review_summary_disliked: first_string(&[review_summary.and_then(|s| s.get("disliked"))]),
        review_summary_disagreed: first_string(&[review_summary.and_then(|s| s.get("disagreed"))]),
        contains_spoilers: bool_at(outer, "contains_spoilers"),
        did_not_finish: bool_at(outer, "did_not_finish"),
        emoji_reaction: first_string(&[
            outer.get("emoji_reaction"),
            outer.get("emoji").and_then(|e| e.get("content")),
        ]),
        spicy_level: number_at(outer, "spicy_level"),
        review_created_at: first_string(&[
            outer.get("review_created_at"),
            outer.get("created_at"),
        ]),
    }
}

fn sub_object<'a>(map: &'a JsonMap, key: &str) -> Option<&'a JsonMap> {
    map.get(key).and_then(Value::as_object)
}

/// Evaluate a fallback chain: the first source holding a non-empty string
/// wins, anything else degrades to empty.
fn first_string(sources: &[Option<&Value>]) -> String {
    for source in sources.iter().copied().flatten() {
        if let Some(s) = source.as_str() {
            if !s.is_empty() {
                return s.to_string();
            }
        }
    }
    String::new()
}

fn string_at(map: &JsonMap, key: &str) -> String {
    first_string(&[map.get(key)])
}

/// Integer fields arrive as JSON numbers or numeric strings.
fn first_integer(sources: &[Option<&Value>]) -> Option<i64> {
    for source in sources.iter().copied().flatten() {
        match source {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(i);
                }
                if let Some(f) = n.as_f64() {
                    return Some(f as i64);
                }
            }
            Value::String(s) => {
                if let Ok(i) = s.trim().parse() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn number_at(map: &JsonMap, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_at(map: &JsonMap, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

/// Collect display names from a list whose entries are strings or
/// `{"name": ...}` objects. Anything else contributes nothing.
fn name_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => map
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        })
        .collect()
}
