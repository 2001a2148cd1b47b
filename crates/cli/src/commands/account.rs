//! `emarket profile ...` and `emarket wishlist ...`

use emarket_client::ApiClient;
use emarket_client::state::{ProfileStore, WishlistStore};
use emarket_client::types::{PasswordChange, UserUpdate};
use emarket_core::ProductId;
use serde_json::json;

use super::{CommandError, Context, print_json};

async fn profile_store(ctx: &Context) -> Result<ProfileStore<ApiClient>, CommandError> {
    ctx.require(&[])?;
    let store = ProfileStore::new(ctx.api.clone());
    store.load().await;
    if let Some(message) = store.error().await {
        return Err(CommandError::Failed(message));
    }
    Ok(store)
}

/// Show the signed-in user's profile.
///
/// # Errors
///
/// Returns an error if not signed in or the profile can't be loaded.
pub async fn show_profile(ctx: &Context) -> Result<(), CommandError> {
    let store = profile_store(ctx).await?;
    print_json(&store.user().await)
}

/// Update name and/or phone.
///
/// # Errors
///
/// Returns an error if the update is refused.
pub async fn update_profile(ctx: &Context, update: &UserUpdate) -> Result<(), CommandError> {
    let store = profile_store(ctx).await?;
    if !store.update(update).await {
        return Err(CommandError::Failed(store.error().await.unwrap_or_default()));
    }
    print_json(&store.user().await)
}

/// Change the password.
///
/// # Errors
///
/// Returns the form guard's message or the backend failure.
pub async fn change_password(ctx: &Context, change: PasswordChange) -> Result<(), CommandError> {
    let store = profile_store(ctx).await?;
    if !store.change_password(change).await {
        return Err(CommandError::Failed(store.error().await.unwrap_or_default()));
    }
    tracing::info!("password changed");
    Ok(())
}

async fn wishlist_store(ctx: &Context) -> Result<WishlistStore<ApiClient>, CommandError> {
    let store = WishlistStore::new(ctx.api.clone(), ctx.user_id()?);
    store.load().await;
    if let Some(message) = store.snapshot().await.error {
        return Err(CommandError::Failed(message));
    }
    Ok(store)
}

/// Show the wishlist.
///
/// # Errors
///
/// Returns an error if not signed in or the wishlist can't be loaded.
pub async fn show_wishlist(ctx: &Context) -> Result<(), CommandError> {
    let store = wishlist_store(ctx).await?;
    print_json(&store.products().await)
}

/// Add or remove a product.
///
/// # Errors
///
/// Returns the API error.
pub async fn toggle_wishlist(ctx: &Context, product_id: ProductId) -> Result<(), CommandError> {
    let store = wishlist_store(ctx).await?;
    let present = store.toggle(product_id).await?;
    print_json(&json!({ "product_id": product_id, "in_wishlist": present }))
}

/// Remove a product.
///
/// # Errors
///
/// Returns the API error.
pub async fn remove_from_wishlist(ctx: &Context, product_id: ProductId) -> Result<(), CommandError> {
    let store = wishlist_store(ctx).await?;
    store.remove(product_id).await?;
    print_json(&store.products().await)
}

/// Ask the server whether a product is on the wishlist.
///
/// # Errors
///
/// Returns an error if not signed in.
pub async fn check_wishlist(ctx: &Context, product_id: ProductId) -> Result<(), CommandError> {
    let user_id = ctx.user_id()?;
    let present = ctx.api.is_in_wishlist(user_id, product_id).await;
    print_json(&json!({ "product_id": product_id, "in_wishlist": present }))
}
