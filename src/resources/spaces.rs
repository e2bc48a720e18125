//! `/spaces`: owner-scoped CRUD.

#[cfg(test)]
#[path = "spaces_test.rs"]
mod spaces_test;

use crate::api::types::{Space, SpaceRequest};
use crate::api::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct Spaces<'a> {
    api: &'a ApiClient,
}

fn space_path(id: &str) -> String {
    format!("/spaces/{id}")
}

impl<'a> Spaces<'a> {
    #[must_use]
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /spaces`
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn list(&self) -> Result<Vec<Space>, ApiError> {
        self.api.request(ApiRequest::get("/spaces")).await
    }

    /// `GET /spaces/{id}`
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn get(&self, id: &str) -> Result<Space, ApiError> {
        self.api.request(ApiRequest::get(space_path(id))).await
    }

    /// `POST /spaces`. The backend answers 201 with the new space, which is kept.
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn create(&self, body: &SpaceRequest) -> Result<Space, ApiError> {
        let request = ApiRequest::post("/spaces").json(body)?.keep_created_body();
        self.api.request(request).await
    }

    /// `PUT /spaces/{id}`
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn update(&self, id: &str, body: &SpaceRequest) -> Result<Space, ApiError> {
        let request = ApiRequest::put(space_path(id)).json(body)?;
        self.api.request(request).await
    }

    /// `DELETE /spaces/{id}`
    ///
    /// # Errors
    ///
    /// Returns the normalized request error.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.execute(ApiRequest::delete(space_path(id))).await
    }
}
