//! `/reviews`: public submission plus owner-scoped curation.

#[cfg(test)]
#[path = "reviews_test.rs"]
mod reviews_test;

use futures::future::join_all;

use crate::api::types::{NewReview, Review};
use crate::api::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct Reviews<'a> {
    api: &'a ApiClient,
}

impl<'a> Reviews<'a> {
    #[must_use]
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /reviews/{spaceId}`
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn list(&self, space_id: &str) -> Result<Vec<Review>, ApiError> {
        self.api.request(ApiRequest::get(format!("/reviews/{space_id}"))).await
    }

    /// Fetch reviews for several spaces concurrently.
    ///
    /// Results come back in input order; a failure for one space does not
    /// affect the others.
    pub async fn list_many<S>(&self, space_ids: &[S]) -> Vec<(String, Result<Vec<Review>, ApiError>)>
    where
        S: AsRef<str>,
    {
        let fetches = space_ids.iter().map(|id| async move {
            let id = id.as_ref();
            let result = self.list(id).await;
            if let Err(e) = &result {
                tracing::warn!(space_id = id, error = %e, "review fetch failed");
            }
            (id.to_owned(), result)
        });
        join_all(fetches).await
    }

    /// `POST /reviews/{slug}`, public; the backend answers 201 with no body.
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn create(&self, slug: &str, review: &NewReview) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("/reviews/{slug}")).json(review)?;
        self.api.execute(request).await
    }

    /// `PUT /reviews/{id}/like` flips `liked` server-side and returns the review.
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn toggle_like(&self, review_id: &str) -> Result<Review, ApiError> {
        self.api.request(ApiRequest::put(format!("/reviews/{review_id}/like"))).await
    }

    /// `DELETE /reviews/{id}`
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn delete(&self, review_id: &str) -> Result<(), ApiError> {
        self.api.execute(ApiRequest::delete(format!("/reviews/{review_id}"))).await
    }
}
