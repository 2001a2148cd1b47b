//! `emarket admin ...`
//!
//! Admin-only back office commands. Role checks here only spare a round
//! trip; the server enforces them.

use std::path::Path;

use emarket_client::api::ADMIN_PAGE_LIMIT;
use emarket_client::listing::{UserCounts, UserFilter};
use emarket_client::types::{
    CategoryDraft, CategoryPatch, NewUser, ProductDraft, ProductPatch, UserPatch,
};
use emarket_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId, UserRole};
use serde_json::json;
use tracing::info;

use super::{ADMIN_ONLY, CommandError, Context, print_json};

// =============================================================================
// Products
// =============================================================================

/// # Errors
///
/// Returns the API error.
pub async fn create_product(ctx: &Context, draft: &ProductDraft) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.admin_create_product(draft).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn update_product(ctx: &Context, id: ProductId, patch: &ProductPatch) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.admin_update_product(id, patch).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn delete_product(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    ctx.api.admin_delete_product(id).await?;
    info!(%id, "product deleted");
    Ok(())
}

/// Upload an image file and print its public URL.
///
/// # Errors
///
/// Returns an error if the file can't be read or the upload fails.
pub async fn upload_image(ctx: &Context, path: &Path) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    let bytes = tokio::fs::read(path).await.map_err(|source| CommandError::Read {
        path: path.to_owned(),
        source,
    })?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    print_json(&ctx.api.upload_product_image(filename, image_mime(path), bytes).await?)
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// # Errors
///
/// Returns the API error.
pub async fn set_stock(ctx: &Context, id: ProductId, stock: u32) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.admin_set_stock(id, stock).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn product_stats(ctx: &Context) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.product_stats().await?)
}

// =============================================================================
// Categories
// =============================================================================

/// # Errors
///
/// Returns the API error.
pub async fn create_category(ctx: &Context, draft: &CategoryDraft) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.admin_create_category(draft).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn update_category(
    ctx: &Context,
    id: CategoryId,
    patch: &CategoryPatch,
) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.admin_update_category(id, patch).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn delete_category(ctx: &Context, id: CategoryId) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    ctx.api.admin_delete_category(id).await?;
    info!(%id, "category deleted");
    Ok(())
}

// =============================================================================
// Orders
// =============================================================================

/// # Errors
///
/// Returns the API error.
pub async fn list_orders(
    ctx: &Context,
    skip: u32,
    limit: Option<u32>,
    status: Option<OrderStatus>,
) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    let page = ctx
        .api
        .admin_list_orders(skip, limit.unwrap_or(ADMIN_PAGE_LIMIT), status)
        .await?;
    print_json(&page)
}

/// Move an order to its next status or cancel it, with an optional note.
///
/// # Errors
///
/// `CommandError::NotAllowed` for any other transition; otherwise the API
/// error.
pub async fn update_order_status(
    ctx: &Context,
    id: OrderId,
    status: OrderStatus,
    note: Option<&str>,
) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    let current = ctx.api.get_order(id).await?.status;
    check_move(current, status)?;
    print_json(&ctx.api.admin_update_order_status(id, status, note).await?)
}

fn check_move(current: OrderStatus, target: OrderStatus) -> Result<(), CommandError> {
    if current.can_move_to(target) {
        return Ok(());
    }
    let hint = current
        .next()
        .map_or_else(String::new, |next| format!(" Next status is {next}."));
    Err(CommandError::NotAllowed(format!(
        "Cannot move a {current} order to {target}.{hint}"
    )))
}

/// # Errors
///
/// Returns the API error.
pub async fn order_stats(ctx: &Context) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.order_stats().await?)
}

// =============================================================================
// Users
// =============================================================================

/// List users, narrowed client-side, with header counters.
///
/// # Errors
///
/// Returns the API error.
pub async fn list_users(
    ctx: &Context,
    skip: u32,
    limit: Option<u32>,
    filter: &UserFilter,
) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    let users = ctx
        .api
        .list_users(skip, limit.unwrap_or(ADMIN_PAGE_LIMIT))
        .await?;
    let counts = UserCounts::from_users(&users);
    print_json(&json!({
        "users": filter.apply(&users),
        "counts": {
            "total": counts.total,
            "admins": counts.admins,
            "staff": counts.staff,
            "customers": counts.customers,
            "active": counts.active,
            "inactive": counts.inactive,
        },
    }))
}

/// Create an account; prints the temporary password once.
///
/// # Errors
///
/// Returns the API error.
pub async fn create_user(ctx: &Context, user: &NewUser) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    let created = ctx.api.create_user(user).await?;
    if !created.email_sent {
        tracing::warn!(email = %created.user.email, "welcome email was not sent; pass the temporary password on manually");
    }
    print_json(&json!({
        "user": created.user,
        "temp_password": created.temp_password,
        "email_sent": created.email_sent,
        "message": created.message,
    }))
}

/// # Errors
///
/// Returns the API error.
pub async fn update_user(ctx: &Context, id: UserId, patch: &UserPatch) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.update_user(id, patch).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn delete_user(ctx: &Context, id: UserId) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    ctx.api.delete_user(id).await?;
    info!(%id, "user deleted");
    Ok(())
}

/// # Errors
///
/// Returns the API error.
pub async fn set_role(ctx: &Context, id: UserId, role: UserRole) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.set_user_role(id, role).await?)
}

/// # Errors
///
/// Returns the API error.
pub async fn set_active(ctx: &Context, id: UserId, active: bool) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.set_user_active(id, active).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime_by_extension() {
        assert_eq!(image_mime(Path::new("a/b/shoe.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("shoe.webp")), "image/webp");
        assert_eq!(image_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_status_change_limited_to_next_or_cancel() {
        assert!(check_move(OrderStatus::Pending, OrderStatus::Confirmed).is_ok());
        assert!(check_move(OrderStatus::Confirmed, OrderStatus::Cancelled).is_ok());

        let err = check_move(OrderStatus::Pending, OrderStatus::Delivered).unwrap_err();
        assert!(matches!(&err, CommandError::NotAllowed(m) if m.contains("Next status is confirmed")));
        assert!(check_move(OrderStatus::Delivered, OrderStatus::Pending).is_err());
        assert!(check_move(OrderStatus::Cancelled, OrderStatus::Shipping).is_err());
    }
}
