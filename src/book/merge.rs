use serde_json::Value;
use std::collections::HashMap;

/// Review data keyed by book id, as assembled from the reviews endpoint
pub type ReviewLookup = HashMap<String, serde_json::Map<String, Value>>;

/// Book id for a raw record, looking through the `book` nesting when present.
pub fn record_id(record: &Value) -> Option<String> {
    let target = match record.get("book") {
        Some(nested) if nested.is_object() => nested,
        _ => record,
    };

    match target.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Overlay review fields onto each raw book record.
///
/// Records that are not JSON objects are dropped; records without a match in
/// the lookup pass through unchanged. Review keys win on collision, which is
/// safe because review records never carry book-intrinsic keys. Each output
/// record is a fresh value; the inputs are never mutated.
pub fn merge_reviews(books: &[Value], reviews: &ReviewLookup) -> Vec<Value> {
    let mut merged = Vec::with_capacity(books.len());

    for book in books {
        let Some(obj) = book.as_object() else {
            continue;
        };

        match record_id(book).and_then(|id| reviews.get(&id)) {
            Some(review) => {
                let mut out = obj.clone();
                for (key, value) in review {
                    out.insert(key.clone(), value.clone());
                }
                merged.push(Value::Object(out));
            }
            None => merged.push(book.clone()),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup_with(id: &str, fields: serde_json::Map<String, Value>) -> ReviewLookup {
        let mut reviews = ReviewLookup::new();
        reviews.insert(id.to_string(), fields);
        reviews
    }

    #[test]
    fn test_merge_empty_lookup_is_identity() {
        let books = vec![
            json!({"id": "A", "title": "Foo"}),
            json!({"book": {"id": "B", "title": "Bar"}}),
        ];

        let merged = merge_reviews(&books, &ReviewLookup::new());
        assert_eq!(merged, books);
    }

    #[test]
    fn test_merge_is_total_over_objects() {
        let books: Vec<Value> = (0..25).map(|i| json!({"id": i.to_string()})).collect();
        let merged = merge_reviews(&books, &ReviewLookup::new());
        assert_eq!(merged.len(), books.len());
    }

    #[test]
    fn test_merge_overlays_review_fields() {
        let mut fields = serde_json::Map::new();
        fields.insert("rating".to_string(), json!(4.5));
        fields.insert("review".to_string(), json!("Loved it"));
        let reviews = lookup_with("A", fields);

        let books = vec![json!({"id": "A", "title": "Foo"})];
        let merged = merge_reviews(&books, &reviews);

        assert_eq!(merged[0]["title"], json!("Foo"));
        assert_eq!(merged[0]["rating"], json!(4.5));
        assert_eq!(merged[0]["review"], json!("Loved it"));
        // input record untouched
        assert!(books[0].get("rating").is_none());
    }

    #[test]
    fn test_merge_matches_nested_book_id() {
        let mut fields = serde_json::Map::new();
        fields.insert("rating".to_string(), json!(3.0));
        let reviews = lookup_with("B", fields);

        let books = vec![json!({"book": {"id": "B", "title": "Bar"}})];
        let merged = merge_reviews(&books, &reviews);

        assert_eq!(merged[0]["rating"], json!(3.0));
        assert_eq!(merged[0]["book"]["title"], json!("Bar"));
    }

    #[test]
    fn test_merge_review_wins_on_collision() {
        let mut fields = serde_json::Map::new();
        fields.insert("created_at".to_string(), json!("2024-05-05T00:00:00Z"));
        let reviews = lookup_with("A", fields);

        let books = vec![json!({"id": "A", "created_at": "2020-01-01T00:00:00Z"})];
        let merged = merge_reviews(&books, &reviews);

        assert_eq!(merged[0]["created_at"], json!("2024-05-05T00:00:00Z"));
    }

    #[test]
    fn test_merge_skips_non_objects() {
        let books = vec![
            Value::Null,
            json!("stray string"),
            json!({"id": "A", "title": "Kept"}),
        ];

        let merged = merge_reviews(&books, &ReviewLookup::new());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["title"], json!("Kept"));
    }

    #[test]
    fn test_merge_unmatched_passes_through() {
        let mut fields = serde_json::Map::new();
        fields.insert("rating".to_string(), json!(5.0));
        let reviews = lookup_with("other-id", fields);

        let books = vec![json!({"id": "A", "title": "Foo"}), json!({"title": "No id"})];
        let merged = merge_reviews(&books, &reviews);

        assert_eq!(merged, books);
    }

    #[test]
    fn test_record_id_variants() {
        assert_eq!(record_id(&json!({"id": "A"})), Some("A".to_string()));
        assert_eq!(
            record_id(&json!({"book": {"id": "B"}, "id": "outer"})),
            Some("B".to_string())
        );
        assert_eq!(record_id(&json!({"id": 12})), Some("12".to_string()));
        assert_eq!(record_id(&json!({"title": "no id"})), None);
        assert_eq!(record_id(&json!(null)), None);
    }
}
