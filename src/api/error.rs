//! Normalized request failure.
//!
//! Every failure leaving the request client is an [`ApiError`] carrying a
//! human-readable message, the HTTP status (`0` for transport failures,
//! `500` for local surprises) and optional JSON details.

use serde_json::Value;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to connect to the server. Please check if the backend is running.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Broad failure class derived from the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced an HTTP response.
    Network,
    /// The server rejected the credentials (401/403).
    AuthRejected,
    /// Any other non-2xx response.
    Http,
    /// A local failure unrelated to the server's answer.
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub details: Option<Value>,
    origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Response,
    Transport,
    Local,
}

impl ApiError {
    /// Error for a server response with a non-2xx status.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>, details: Option<Value>) -> Self {
        Self { message: message.into(), status, details, origin: Origin::Response }
    }

    /// Error for a request that never got a response.
    #[must_use]
    pub fn network(cause: &str) -> Self {
        Self {
            message: NETWORK_ERROR_MESSAGE.to_owned(),
            status: 0,
            details: Some(serde_json::json!({ "originalError": cause })),
            origin: Origin::Transport,
        }
    }

    /// Error for a local failure; the cause is kept in `details`.
    #[must_use]
    pub fn unexpected(cause: &str) -> Self {
        Self {
            message: UNEXPECTED_ERROR_MESSAGE.to_owned(),
            status: 500,
            details: Some(serde_json::json!({ "originalError": cause })),
            origin: Origin::Local,
        }
    }

    /// Build the error for a failed response from its status and body text.
    ///
    /// A JSON body's `message` field wins; non-JSON text is used verbatim;
    /// anything else falls back to `"HTTP <status>"`.
    #[must_use]
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let fallback = status_message(status);
        if body.is_empty() {
            return Self::http(status, fallback.clone(), Some(serde_json::json!({ "message": fallback })));
        }
        match serde_json::from_str::<Value>(body) {
            Ok(details) => {
                let message = details
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map_or(fallback, ToOwned::to_owned);
                Self::http(status, message, Some(details))
            }
            Err(_) => Self::http(status, body, Some(serde_json::json!({ "message": body }))),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ApiErrorKind {
        match self.origin {
            Origin::Transport => ApiErrorKind::Network,
            Origin::Local => ApiErrorKind::Unexpected,
            Origin::Response if matches!(self.status, 401 | 403) => ApiErrorKind::AuthRejected,
            Origin::Response => ApiErrorKind::Http,
        }
    }

    /// `true` for 401/403 responses.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        self.kind() == ApiErrorKind::AuthRejected
    }
}

#[must_use]
pub fn status_message(status: u16) -> String {
    format!("HTTP {status}")
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
