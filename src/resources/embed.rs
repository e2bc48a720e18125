//! `/embed`: public, read-only review feed for third-party widgets.

#[cfg(test)]
#[path = "embed_test.rs"]
mod embed_test;

use crate::api::types::Review;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::state::wall::liked_reviews;

#[derive(Debug, Clone, Copy)]
pub struct Embed<'a> {
    api: &'a ApiClient,
}

impl<'a> Embed<'a> {
    #[must_use]
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /embed/{spaceId}`. Filtering for display is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn list(&self, space_id: &str) -> Result<Vec<Review>, ApiError> {
        self.api.request(ApiRequest::get(format!("/embed/{space_id}"))).await
    }

    /// The embed feed reduced to liked reviews ("Wall of Love").
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn wall_of_love(&self, space_id: &str) -> Result<Vec<Review>, ApiError> {
        let reviews = self.list(space_id).await?;
        Ok(liked_reviews(reviews))
    }
}
