//! Aggregate numbers shown next to a space's testimonials.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use crate::api::types::Review;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReviewStats {
    pub total: usize,
    pub liked: usize,
    /// Mean star rating; `None` when there are no reviews.
    pub average_rating: Option<f64>,
}

impl ReviewStats {
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let total = reviews.len();
        let liked = reviews.iter().filter(|r| r.liked).count();
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating.get())).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_rating = (total > 0).then(|| f64::from(sum) / total as f64);
        Self { total, liked, average_rating }
    }

    /// Average formatted to one decimal, or `"-"` without reviews.
    #[must_use]
    pub fn average_label(&self) -> String {
        self.average_rating.map_or_else(|| "-".to_owned(), |avg| format!("{avg:.1}"))
    }
}
