/// Canonical book record consumed by every exporter.
///
/// Every field is always present regardless of the shape of the raw input:
/// absent values degrade to empty strings, empty vectors, or `None`, so
/// rendering code never has to re-check shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBook {
    pub title: String,
    pub subtitle: String,
    /// Author display names, in the order the API returned them
    pub authors: Vec<String>,
    /// Raw ISBN as provided, hyphens and all; split happens at export time
    pub isbn: String,

    pub imprint: String,
    pub page_count: Option<i64>,
    pub published_date: String,
    pub description: String,
    pub cover_image: String,

    pub genres: Vec<String>,
    pub storygraph_genres: Vec<String>,
    pub moods: Vec<String>,
    pub content_warnings: Vec<String>,
    pub attributes: Vec<String>,

    /// "finished" | "reading" | "unread", another service value, or empty
    pub status: String,
    pub current_page: Option<i64>,
    pub total_pages: Option<i64>,
    pub started_reading_at: String,
    pub finished_reading_at: String,
    pub added_at: String,

    /// 0-5 scale
    pub rating: Option<f64>,
    pub characters_rating: Option<f64>,
    pub plot_rating: Option<f64>,
    pub writing_style_rating: Option<f64>,
    pub setting_rating: Option<f64>,
    pub review: String,
    pub review_summary_liked: String,
    pub review_summary_disliked: String,
    pub review_summary_disagreed: String,
    pub contains_spoilers: Option<bool>,
    pub did_not_finish: Option<bool>,
    pub emoji_reaction: String,
    pub spicy_level: Option<f64>,
    pub review_created_at: String,
}

impl NormalizedBook {
    /// Raw timestamp to report as "Date Added": the review creation time
    /// when the book was reviewed, else when it was added to a list.
    pub fn date_added_raw(&self) -> &str {
        if !self.review_created_at.is_empty() {
            &self.review_created_at
        } else {
            &self.added_at
        }
    }

    pub fn has_detailed_ratings(&self) -> bool {
        [
            self.characters_rating,
            self.plot_rating,
            self.writing_style_rating,
            self.setting_rating,
        ]
        .iter()
        .any(|r| r.map_or(false, |v| v != 0.0))
    }
}
