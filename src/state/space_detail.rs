//! One space with its reviews, as seen by the owner.

#[cfg(test)]
#[path = "space_detail_test.rs"]
mod space_detail_test;

use crate::api::types::{Review, Space, SpaceRequest};
use crate::api::{ApiClient, ApiError};
use crate::state::stats::ReviewStats;
use crate::state::wall::public_submission_path;

#[derive(Debug, Clone, PartialEq)]
pub struct SpaceDetail {
    pub space: Space,
    pub reviews: Vec<Review>,
}

impl SpaceDetail {
    /// Fetch the space and its reviews concurrently. Either failure fails the load.
    ///
    /// # Errors
    ///
    /// Returns the first request error.
    pub async fn load(api: &ApiClient, space_id: &str) -> Result<Self, ApiError> {
        let spaces = api.spaces();
        let reviews = api.reviews();
        let (space, reviews) = futures::try_join!(spaces.get(space_id), reviews.list(space_id))?;
        Ok(Self { space, reviews })
    }

    #[must_use]
    pub fn stats(&self) -> ReviewStats {
        ReviewStats::from_reviews(&self.reviews)
    }

    #[must_use]
    pub fn submission_path(&self) -> String {
        public_submission_path(&self.space.slug)
    }

    /// Update name and redirect URL; the local space is replaced by the server's copy.
    ///
    /// # Errors
    ///
    /// Returns the request error; local state is unchanged.
    pub async fn save(&mut self, api: &ApiClient, changes: &SpaceRequest) -> Result<&Space, ApiError> {
        let updated = api.spaces().update(&self.space.id, changes).await?;
        self.space = updated;
        Ok(&self.space)
    }

    /// Toggle a review's liked flag and swap in the server's copy.
    ///
    /// # Errors
    ///
    /// Returns the request error; local state is unchanged.
    pub async fn toggle_like(&mut self, api: &ApiClient, review_id: &str) -> Result<(), ApiError> {
        let updated = api.reviews().toggle_like(review_id).await?;
        if let Some(slot) = self.reviews.iter_mut().find(|r| r.id == review_id) {
            *slot = updated;
        }
        Ok(())
    }

    /// Delete a review and drop it locally.
    ///
    /// # Errors
    ///
    /// Returns the request error; local state is unchanged.
    pub async fn delete_review(&mut self, api: &ApiClient, review_id: &str) -> Result<(), ApiError> {
        api.reviews().delete(review_id).await?;
        self.reviews.retain(|r| r.id != review_id);
        Ok(())
    }
}
