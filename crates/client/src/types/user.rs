//! User and account types.

use emarket_core::{Email, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Minimum length the profile form accepts for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

impl User {
    /// Name to show, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

const fn active_by_default() -> bool {
    true
}

/// Body of `PUT /users/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Admin partial update of another user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Body of `POST /users/me/change-password`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for ChangePassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePassword")
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}

/// The three fields of the change-password form, before they become a
/// [`ChangePassword`] request.
#[derive(Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange([REDACTED])")
    }
}

impl PasswordChange {
    /// Apply the form's guards and build the request.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message if the confirmation doesn't match, the
    /// new password is too short, or it equals the current one.
    pub fn into_request(self) -> Result<ChangePassword, String> {
        if self.current.is_empty() {
            return Err("current password is required".to_string());
        }
        if self.new != self.confirm {
            return Err("new password and confirmation do not match".to_string());
        }
        if self.new.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "new password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        if self.new == self.current {
            return Err("new password must differ from the current one".to_string());
        }
        Ok(ChangePassword {
            current_password: self.current,
            new_password: self.new,
        })
    }
}

/// Body of `POST /admin/users`. Admins may only create customers and staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: Email,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
}

impl NewUser {
    /// Guard applied before sending.
    ///
    /// # Errors
    ///
    /// Rejects a blank name or an admin role.
    pub fn check(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("full name is required".to_string());
        }
        if self.role == UserRole::Admin {
            return Err("new accounts may only be customer or staff".to_string());
        }
        Ok(())
    }
}

/// Response of `POST /admin/users`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserResponse {
    pub user: User,
    pub temp_password: String,
    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Debug for CreateUserResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserResponse")
            .field("user", &self.user)
            .field("temp_password", &"[REDACTED]")
            .field("email_sent", &self.email_sent)
            .field("message", &self.message)
            .finish()
    }
}
