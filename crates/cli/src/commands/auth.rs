//! `emarket auth ...`

use emarket_client::types::{LoginRequest, RegisterRequest};
use emarket_core::Email;
use serde_json::json;
use tracing::info;

use super::{CommandError, Context, print_json};

/// Log in and persist the token.
///
/// # Errors
///
/// Returns an error if the email is malformed, the credentials are rejected,
/// or the session file can't be written.
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), CommandError> {
    let request = LoginRequest {
        email: parse_email(email)?,
        password,
    };
    let token = ctx.api.login(&request).await?;
    ctx.save_session()?;

    print_json(&json!({
        "user_id": token.user_id,
        "role": token.role,
        "full_name": token.full_name,
        "home": token.role.home_path(),
    }))
}

/// Create a customer account.
///
/// # Errors
///
/// Returns an error if the email is malformed or the backend refuses.
pub async fn register(
    ctx: &Context,
    full_name: String,
    email: &str,
    password: String,
) -> Result<(), CommandError> {
    let request = RegisterRequest {
        full_name,
        email: parse_email(email)?,
        password,
    };
    let account = ctx.api.register(&request).await?;
    info!(user_id = %account.id, "account created");
    print_json(&account)
}

/// Log out and forget the saved token, even if the server call fails.
///
/// # Errors
///
/// Returns an error only if the session file can't be removed.
pub async fn logout(ctx: &Context) -> Result<(), CommandError> {
    if let Err(e) = ctx.api.logout().await {
        tracing::warn!(error = %e, "server logout failed");
    }
    ctx.save_session()?;
    info!("signed out");
    Ok(())
}

pub(super) fn parse_email(raw: &str) -> Result<Email, CommandError> {
    Email::parse(raw).map_err(|e| CommandError::Failed(format!("invalid email {raw:?}: {e}")))
}
