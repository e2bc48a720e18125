//! TestiFlow client: session, request and controller layers for the
//! testimonial-collection API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Callers (the CLI, or any embedding UI) talk to the auth and resource
//! controllers. Every controller goes through one [`api::ApiClient`], which
//! owns the injected [`session::SessionStore`] and attaches the bearer token
//! to each request.
//!
//! LAYERS
//! ======
//! - `session`: token persistence behind a trait.
//! - `api`: request client, error normalization, wire types.
//! - `auth`: login/signup/logout/refresh state machine.
//! - `resources`: spaces, reviews, embed endpoints.
//! - `state`: local view models that only change after the server confirms.

pub mod api;
pub mod auth;
pub mod config;
pub mod resources;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError, ApiErrorKind};
pub use auth::{AuthController, AuthError, AuthPhase, Navigator, Route};
pub use config::ClientConfig;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
