//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const STORAGE_DIR_NAME: &str = "testiflow";

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL does not use an HTTP scheme.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No storage directory was configured and the platform has none.
    #[error("no storage directory available; set TESTIFLOW_STORAGE_DIR")]
    MissingStorageDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash (e.g. `"http://localhost:8080/api"`).
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    /// Directory holding the persisted session file.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_URL.to_owned(), request_timeout: None, storage_dir: None }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TESTIFLOW_API_URL`: default `http://localhost:8080/api`
    /// - `TESTIFLOW_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `TESTIFLOW_STORAGE_DIR`: default `<config dir>/testiflow`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an `http(s)` URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("TESTIFLOW_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let base_url = normalize_base_url(&base_url)?;

        let request_timeout = lookup("TESTIFLOW_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let storage_dir = lookup("TESTIFLOW_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { base_url, request_timeout, storage_dir })
    }

    /// Replace the base URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an `http(s)` URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Resolve the session storage directory, falling back to the platform
    /// config dir.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingStorageDir`] when neither is available.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(STORAGE_DIR_NAME))
            .ok_or(ConfigError::MissingStorageDir)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.trim_end_matches('/').to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
