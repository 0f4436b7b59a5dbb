//! Authentication state.
//!
//! [`AuthContext`] owns the API client and tracks whether a user is signed
//! in. It starts in [`AuthState::Loading`] until [`AuthContext::restore`]
//! reads the persisted session.

use anyhow::{Result, bail};
use taller_types::{RegisterFields, User};

use crate::api::{ApiClient, ApiError};

/// Message shown when a command needs a session and there is none.
pub const NOT_LOGGED_IN: &str = "Not logged in. Run `taller login` first.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The persisted session hasn't been read yet
    Loading,
    Authenticated { user: User },
    Unauthenticated,
}

#[derive(Debug)]
pub struct AuthContext {
    client: ApiClient,
    state: AuthState,
}

impl AuthContext {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: AuthState::Loading,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    /// Returns the signed-in user, or an error for commands that need one.
    pub fn require_user(&self) -> Result<&User> {
        match self.user() {
            Some(user) => Ok(user),
            None => bail!(NOT_LOGGED_IN),
        }
    }

    /// Resolves `Loading` from the persisted session.
    ///
    /// An unreadable session counts as signed out.
    pub fn restore(&mut self) -> &AuthState {
        self.state = match self.client.session() {
            Ok(Some(session)) => {
                tracing::debug!(user_id = %session.user.id, "session restored");
                AuthState::Authenticated { user: session.user }
            }
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                tracing::warn!("failed to read session: {e}");
                AuthState::Unauthenticated
            }
        };
        &self.state
    }

    /// Signs in. On failure the state is left as it was.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self.client.login(email, password).await?;
        self.state = AuthState::Authenticated { user: user.clone() };
        Ok(user)
    }

    /// Creates an account without signing in.
    pub async fn register(&self, fields: &RegisterFields) -> Result<User, ApiError> {
        self.client.register(fields).await
    }

    /// Signs out. The state is reset even if the session can't be removed.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.state = AuthState::Unauthenticated;
        self.client.logout().map(|_| ())
    }

    /// Drops to `Unauthenticated` when the service rejected the token.
    ///
    /// Only a 401 counts, matching when the client clears the stored
    /// session. A 403 leaves both in place.
    pub fn note_failure(&mut self, err: &ApiError) {
        if err.is_token_rejected() && self.is_authenticated() {
            tracing::info!("session rejected; signing out");
            self.state = AuthState::Unauthenticated;
        }
    }
}
