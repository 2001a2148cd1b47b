//! `/auth` endpoints.

use reqwest::Method;
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use super::ApiClient;
use crate::error::ApiError;
use crate::session::SessionUser;
use crate::types::{AuthToken, LoginRequest, RegisterRequest, Registered};

impl ApiClient {
    /// Log in with email and password and store the token in the session.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched; the session is left as it was.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError> {
        let token: AuthToken = self.post_form("/auth/login", &request.form_fields()).await?;

        self.session().sign_in(
            SecretString::from(token.access_token.clone()),
            SessionUser {
                user_id: token.user_id,
                role: token.role,
                full_name: token.full_name.clone(),
            },
        );
        info!(user_id = %token.user_id, role = %token.role, "signed in");

        Ok(token)
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Registered, ApiError> {
        self.post("/auth/register", request).await
    }

    /// Log out. The session is cleared whether or not the server call
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns the API error after the session has been cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .send_empty(Method::POST, "/auth/logout", &[], Some(&serde_json::json!({})))
            .await;
        self.session().clear();

        if let Err(e) = &result {
            warn!(error = %e, "logout call failed; local session cleared anyway");
        }
        result
    }
}
