//! Auth controller: login, signup, logout, and current-user refresh.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the auth state machine (`Anonymous` → `Authenticating` →
//! `Authenticated`) on top of the shared [`ApiClient`]. It is the only writer
//! of the session store and the only component that emits navigation.
//!
//! TRADE-OFFS
//! ==========
//! A token is stored only after the login response carries one, and is
//! removed again if the follow-up `/auth/me` fails, so the store never holds
//! a token the controller could not turn into a user.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::api::types::{LoginRequest, LoginResponse, SignupRequest, User};
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::session::SessionError;

/// Errors surfaced by auth operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Login succeeded at the HTTP level but carried no token.
    #[error("No access token received")]
    MissingAccessToken,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// The underlying request error, if any.
    #[must_use]
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Navigation targets emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Login,
    /// Login screen reached right after a successful signup.
    LoginAfterSignup,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Login => "/auth/login",
            Self::LoginAfterSignup => "/auth/login?signup=success",
        }
    }
}

/// Receiver of navigation signals.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route),
{
    fn navigate(&self, route: Route) {
        self(route);
    }
}

/// Snapshot of what the controller currently knows.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<User>,
    /// Message of the most recent failed operation, cleared on the next attempt.
    pub error: Option<String>,
}

pub struct AuthController<N> {
    api: ApiClient,
    navigator: N,
    state: AuthState,
    initialized: bool,
}

impl<N: Navigator> AuthController<N> {
    #[must_use]
    pub fn new(api: ApiClient, navigator: N) -> Self {
        Self { api, navigator, state: AuthState::default(), initialized: false }
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.state.phase
    }

    /// Current bearer token, read from the session store.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.api.session().get()
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// `true` once startup finished and nobody is signed in.
    #[must_use]
    pub fn needs_login_redirect(&self) -> bool {
        self.initialized && self.state.phase != AuthPhase::Authenticating && self.state.user.is_none()
    }

    /// Restore the session from storage. Runs once; later calls do nothing.
    pub async fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.token().is_none() {
            return;
        }

        self.state.phase = AuthPhase::Authenticating;
        match self.fetch_current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                self.become_authenticated(user);
            }
            Err(e) => {
                tracing::warn!(status = e.status, error = %e, "stored session rejected; clearing token");
                self.clear_token();
                self.become_anonymous();
            }
        }
    }

    /// Sign in and fetch the current user. Navigates to the dashboard on success.
    ///
    /// # Errors
    ///
    /// Returns the request error, [`AuthError::MissingAccessToken`] when the
    /// response has no token, or a storage error.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        self.state.phase = AuthPhase::Authenticating;
        self.state.error = None;
        tracing::info!("login attempt");

        match self.try_login(email, password).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "login succeeded");
                self.become_authenticated(user.clone());
                self.navigator.navigate(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.state.error = Some(e.to_string());
                self.become_anonymous();
                Err(e)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let request = ApiRequest::post("/auth/login").json(&LoginRequest { email, password })?;
        let response: LoginResponse = self.api.request(request).await?;
        let token = response.token().ok_or(AuthError::MissingAccessToken)?;

        self.api.session().set(token)?;
        match self.fetch_current_user().await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.clear_token();
                Err(e.into())
            }
        }
    }

    /// Register a new account. Navigates to the login screen; does not sign in.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        self.state.error = None;
        match self.try_signup(name, email, password).await {
            Ok(()) => {
                tracing::info!("signup succeeded");
                self.navigator.navigate(Route::LoginAfterSignup);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(status = e.status, error = %e, "signup failed");
                self.state.error = Some(e.message.clone());
                Err(e.into())
            }
        }
    }

    async fn try_signup(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post("/auth/signup").json(&SignupRequest { name, email, password })?;
        self.api.execute(request).await
    }

    /// Forget the session locally and go to the login screen.
    pub fn logout(&mut self) {
        self.clear_token();
        self.become_anonymous();
        tracing::info!("logged out");
        self.navigator.navigate(Route::Login);
    }

    /// Re-fetch the current user. Auth rejection (401/403) logs out.
    ///
    /// # Errors
    ///
    /// Returns the request error after any logout it triggered.
    pub async fn refresh_user(&mut self) -> Result<(), AuthError> {
        if self.token().is_none() {
            return Ok(());
        }

        match self.fetch_current_user().await {
            Ok(user) => {
                self.become_authenticated(user);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(status = e.status, error = %e, "user refresh failed");
                if e.is_auth_rejection() {
                    self.logout();
                }
                Err(e.into())
            }
        }
    }

    async fn fetch_current_user(&self) -> Result<User, ApiError> {
        self.api.request(ApiRequest::get("/auth/me")).await
    }

    fn become_authenticated(&mut self, user: User) {
        self.state.phase = AuthPhase::Authenticated;
        self.state.user = Some(user);
    }

    fn become_anonymous(&mut self) {
        self.state.phase = AuthPhase::Anonymous;
        self.state.user = None;
    }

    fn clear_token(&self) {
        if let Err(e) = self.api.session().clear() {
            tracing::error!(error = %e, "failed to clear stored token");
        }
    }
}
