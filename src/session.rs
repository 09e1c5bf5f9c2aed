//! Signed-in state, passed explicitly to whatever issues backend requests.
//!
//! A context is created signed out, gains a session on sign-in and loses it on sign-out.
//! At start-up it can be rehydrated from a previously stored token and user. Where those
//! are stored is up to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("The stored user could not be read: {0}")]
    MalformedUser(#[from] serde_json::Error),

    #[error("A session token must not be empty")]
    EmptyToken,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: User,
}

impl Session {
    pub fn new(token: String, user: User) -> Result<Self, SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Session { token, user })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a session stored by a previous run.
    ///
    /// Both the token and the user must be present and readable, otherwise the context
    /// starts signed out.
    pub fn rehydrate(token: Option<&str>, user_json: Option<&str>) -> Self {
        let (Some(token), Some(user_json)) = (token, user_json) else {
            return Self::new();
        };
        match Self::restore(token, user_json) {
            Ok(session) => {
                debug!(user_id = %session.user.id, "session rehydrated");
                SessionContext {
                    session: Some(session),
                }
            }
            Err(err) => {
                warn!(error = %err, "discarding stored session");
                Self::new()
            }
        }
    }

    fn restore(token: &str, user_json: &str) -> Result<Session, SessionError> {
        let user: User = serde_json::from_str(user_json)?;
        Session::new(token.to_string(), user)
    }

    pub fn sign_in(&mut self, token: String, user: User) -> Result<(), SessionError> {
        let session = Session::new(token, user)?;
        debug!(user_id = %session.user.id, "signed in");
        self.session = Some(session);
        Ok(())
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(user_id = %session.user.id, "signed out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    /// Value of the `Authorization` header for backend requests
    pub fn authorization_header(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| format!("Bearer {}", session.token))
    }

    /// The user as JSON, for the caller to store next to the token
    pub fn stored_user(&self) -> Option<Result<String, SessionError>> {
        self.user()
            .map(|user| serde_json::to_string(user).map_err(SessionError::from))
    }
}
