//! Authentication types.

use emarket_core::{Email, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Credentials for `POST /auth/login`.
///
/// Sent form-encoded as `username`/`password` (OAuth2 password flow).
#[derive(Clone)]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginRequest {
    /// Form fields in the order the auth service expects them.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("username", self.email.as_str()), ("password", &self.password)]
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Response of `POST /auth/login`.
#[derive(Clone, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

fn bearer() -> String {
    "bearer".to_string()
}
