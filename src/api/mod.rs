//! Typed request client for the TestiFlow REST API.
//!
//! DESIGN
//! ======
//! One network call per [`ApiClient::send`]: no retries, no cancellation.
//! The client builds the absolute URL from the configured base, always sends
//! `Content-Type: application/json`, and attaches `Authorization: Bearer`
//! when the injected session store holds a token.
//!
//! ERROR HANDLING
//! ==============
//! Failures are never recovered here. Transport errors become status `0`,
//! non-2xx responses carry the server's message, and anything else is a
//! status `500` wrapping the original cause. See [`ApiError`].
//!
//! EMPTY RESULTS
//! =============
//! 201 and 204 responses yield [`Payload::Empty`] unless the request opts
//! into keeping the 201 body. A success body that is not JSON also yields
//! `Empty`; the typed layer turns that into `T::default()` and logs a warning,
//! because it can hide a backend that answered with something unexpected.
//! Decoding is all-or-nothing: for a list type, one record that fails to
//! decode (a rating outside `1..=5`, say) yields an empty list.

pub mod error;
pub mod types;

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{ApiError, ApiErrorKind};

use crate::config::ClientConfig;
use crate::session::SessionStore;

// =============================================================================
// REQUEST
// =============================================================================

/// Description of a single API call relative to the base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: Vec<(HeaderName, HeaderValue)>,
    keep_created_body: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: Vec::new(), keep_created_body: false }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an unexpected-failure [`ApiError`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::unexpected(&e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header that replaces any default with the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Decode the body of a 201 response instead of treating it as empty.
    #[must_use]
    pub fn keep_created_body(mut self) -> Self {
        self.keep_created_body = true;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Outcome of a successful call before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Value),
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from config, sharing `session` with its owner.
    ///
    /// # Errors
    ///
    /// Returns an unexpected-failure [`ApiError`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::unexpected(&e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned(), session })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store whose token is attached to requests.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers_for(&self, request: &ApiRequest) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.session.get() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("stored token is not a valid header value; sending unauthenticated"),
            }
        }
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }

    /// Perform one call and return the untyped payload.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures, non-2xx responses, and
    /// local failures while building the request.
    pub async fn send(&self, request: ApiRequest) -> Result<Payload, ApiError> {
        let url = self.url_for(&request.path);
        let headers = self.headers_for(&request);
        tracing::debug!(
            method = %request.method,
            %url,
            token_present = headers.contains_key(AUTHORIZATION),
            "api request"
        );

        let mut builder = self.http.request(request.method.clone(), &url).headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::unexpected(&e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(|e| classify_transport(&e))?;
        let status = response.status().as_u16();
        tracing::debug!(status, %url, "api response");

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = ApiError::from_response_body(status, &text);
            tracing::warn!(status, %url, message = %err.message, "api request failed");
            return Err(err);
        }

        if status == 204 || (status == 201 && !request.keep_created_body) {
            return Ok(Payload::Empty);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, %url, "success response body unreadable; treating as empty");
                return Ok(Payload::Empty);
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(Payload::Json(value)),
            Err(_) => {
                if !bytes.is_empty() {
                    tracing::warn!(status, %url, "success response was not JSON; treating as empty");
                }
                Ok(Payload::Empty)
            }
        }
    }

    /// Perform one call and decode the payload into `T`.
    ///
    /// Empty payloads, and payloads that do not match `T`, become `T::default()`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn request<T>(&self, request: ApiRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let path = request.path.clone();
        match self.send(request).await? {
            Payload::Empty => Ok(T::default()),
            Payload::Json(value) => Ok(decode_or_default(value, &path)),
        }
    }

    /// Perform one call whose body, if any, is irrelevant.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}

fn decode_or_default<T>(value: Value, path: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(error = %e, path, "success response did not match expected shape; using empty result");
            T::default()
        }
    }
}

fn classify_transport(error: &reqwest::Error) -> ApiError {
    if error.is_connect() || error.is_timeout() || error.is_request() {
        tracing::warn!(error = %error, "api transport failure");
        ApiError::network(&error.to_string())
    } else {
        tracing::error!(error = %error, "api request failed unexpectedly");
        ApiError::unexpected(&error.to_string())
    }
}
