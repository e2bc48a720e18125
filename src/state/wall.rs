//! Wall of Love helpers.

#[cfg(test)]
#[path = "wall_test.rs"]
mod wall_test;

use crate::api::types::Review;

/// Keep only liked reviews, preserving order.
#[must_use]
pub fn liked_reviews(reviews: Vec<Review>) -> Vec<Review> {
    reviews.into_iter().filter(|r| r.liked).collect()
}

/// Path of the public submission page for a space slug.
#[must_use]
pub fn public_submission_path(slug: &str) -> String {
    format!("/t/{slug}")
}
