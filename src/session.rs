//! Bearer-token session storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The request client reads the token before every call; only the auth
//! controller writes it. One store instance is shared between them through
//! an `Arc<dyn SessionStore>` handed to [`crate::api::ApiClient`].
//!
//! PERSISTENCE
//! ===========
//! [`FileSessionStore`] keeps a small JSON key/value file (`storage.json`)
//! with the token under [`AUTH_TOKEN_KEY`]. Other keys are left untouched so
//! the file can hold unrelated client settings.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Top-level object of the storage file; values of other keys are kept as-is.
type Entries = Map<String, Value>;

/// Errors produced while persisting the session token.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the storage file failed.
    #[error("session storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The storage file could not be encoded or decoded.
    #[error("session storage is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Holder of the single live bearer token.
pub trait SessionStore: Send + Sync {
    /// Current token, or `None` if never set, cleared, or empty.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        let guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone().filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let mut guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Store backed by `<dir>/storage.json`.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(STORAGE_FILE_NAME), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(source) => return Err(SessionError::Io { path: self.path.clone(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let rendered = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, rendered).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }

    /// Read-modify-write under the process lock. An unparseable file is
    /// replaced rather than blocking sign-in or sign-out.
    fn update<F>(&self, apply: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut Entries),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(SessionError::Encoding(e)) => {
                tracing::warn!(error = %e, path = %self.path.display(), "session storage corrupt; rewriting");
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        match self.read_entries() {
            Ok(entries) => entries
                .get(AUTH_TOKEN_KEY)
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned),
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; treating as signed out");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        self.update(|entries| {
            entries.insert(AUTH_TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        })
    }

    fn clear(&self) -> Result<(), SessionError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(AUTH_TOKEN_KEY);
        })
    }
}
