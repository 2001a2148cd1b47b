//! Explicit session handle.
//!
//! Holds the bearer token (and who it belongs to) that [`ApiClient`] attaches
//! to every request. A browser keeps this in local storage and reads it from
//! an interceptor; here the handle is created by the caller and passed into
//! the client, so tests and tools can run several independent sessions side
//! by side.
//!
//! Clones share state: logging in through one clone is visible to the client
//! holding another.
//!
//! [`ApiClient`]: crate::ApiClient

use std::sync::{Arc, PoisonError, RwLock};

use emarket_core::{UserId, UserRole};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// The signed-in account, as reported by the login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: UserId,
    pub role: UserRole,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    user: Option<SessionUser>,
}

/// Shared, cheaply clonable session handle.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user())
            .finish()
    }
}

impl Session {
    /// An anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that already carries a token, user unknown.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    /// The signed-in user, if known.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    /// Whether requests will carry a bearer token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .is_some()
    }

    /// Replace the token, keeping the known user.
    pub fn set_token(&self, token: SecretString) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .token = Some(token);
    }

    /// Record a successful sign-in.
    pub fn sign_in(&self, token: SecretString, user: SessionUser) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(token);
        state.user = Some(user);
    }

    /// Forget the token and the user.
    pub fn clear(&self) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = None;
        state.user = None;
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn shopper() -> SessionUser {
        SessionUser {
            user_id: UserId::new(3),
            role: UserRole::Customer,
            full_name: Some("Tran Thi B".to_string()),
        }
    }

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::new();
        let clone = session.clone();
        clone.sign_in(SecretString::from("tok".to_string()), shopper());

        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(shopper()));
        assert_eq!(session.token().unwrap().expose_secret(), "tok");

        session.clear();
        assert!(!clone.is_authenticated());
        assert!(clone.user().is_none());
    }

    #[test]
    fn test_debug_never_prints_token() {
        let session = Session::with_token(SecretString::from("hunter2".to_string()));
        assert!(!format!("{session:?}").contains("hunter2"));
    }
}
