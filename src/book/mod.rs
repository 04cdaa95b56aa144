mod merge;
mod normalize;
mod types;

pub use merge::{merge_reviews, record_id, ReviewLookup};
pub use normalize::normalize;
pub use types::NormalizedBook;
