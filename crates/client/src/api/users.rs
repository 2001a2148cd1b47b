//! `/users/me` endpoints.

use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{ChangePassword, User, UserUpdate};

impl ApiClient {
    /// The signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched (401 without a valid token).
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.get("/users/me").await
    }

    /// Update name and phone.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, update))]
    pub async fn update_me(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.put("/users/me", update).await
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched (400 if the current password is wrong).
    #[instrument(skip(self, request))]
    pub async fn change_password(&self, request: &ChangePassword) -> Result<User, ApiError> {
        self.post("/users/me/change-password", request).await
    }
}
