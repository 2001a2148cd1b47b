//! `emarket orders ...`

use emarket_client::ApiClient;
use emarket_client::listing::OrderListFilter;
use emarket_client::state::{OrderBoard, PendingAction};
use emarket_client::types::OrderFilter;
use emarket_core::{OrderId, OrderStatus, Price};
use serde_json::json;

use super::{BACK_OFFICE, CommandError, Context, print_json};

/// The signed-in customer's orders.
///
/// # Errors
///
/// Returns an error if not signed in or the call fails.
pub async fn mine(ctx: &Context) -> Result<(), CommandError> {
    let user_id = ctx.user_id()?;
    print_json(&ctx.api.get_user_orders(user_id).await?)
}

/// One order.
///
/// # Errors
///
/// Returns the API error.
pub async fn show(ctx: &Context, id: OrderId) -> Result<(), CommandError> {
    let order = ctx.api.get_order(id).await?;
    print_json(&json!({
        "order": order,
        "status_label": order.status.label(),
        "next_action": order.status.next().and_then(OrderStatus::advance_label),
        "total_display": order.total.format_vnd(),
        "total_matches_items": order.total_matches_items(),
    }))
}

/// Staff order desk listing with server-side filters.
///
/// # Errors
///
/// Returns the API error.
pub async fn desk(ctx: &Context, filter: &OrderFilter) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.list_orders(filter).await?)
}

async fn loaded_board(
    ctx: &Context,
    status: Option<OrderStatus>,
) -> Result<OrderBoard<ApiClient>, CommandError> {
    ctx.require(BACK_OFFICE)?;
    let board = OrderBoard::new(ctx.api.clone());
    board.load(status).await;
    if let Some(message) = board.snapshot().await.error {
        return Err(CommandError::Failed(message));
    }
    Ok(board)
}

/// The order board: matching orders plus per-status counters of the loaded
/// page.
///
/// # Errors
///
/// Returns an error if the orders can't be loaded.
pub async fn board(ctx: &Context, filter: &OrderListFilter) -> Result<(), CommandError> {
    let board = loaded_board(ctx, filter.status).await?;
    let counts = board.status_counts().await;
    print_json(&json!({
        "orders": board.matching(filter).await,
        "counts": {
            "total": counts.total,
            "pending": counts.pending,
            "confirmed": counts.confirmed,
            "shipping": counts.shipping,
            "delivered": counts.delivered,
            "cancelled": counts.cancelled,
        },
    }))
}

/// Move an order to its next status.
///
/// # Errors
///
/// Returns an error if the order can't advance or the backend refuses.
pub async fn advance(ctx: &Context, id: OrderId) -> Result<(), CommandError> {
    let board = loaded_board(ctx, None).await?;
    print_json(&board.advance(id).await?)
}

/// Cancel or refund, only once `confirmed`.
///
/// # Errors
///
/// `CommandError::NotAllowed` with the confirmation prompt when not
/// confirmed; otherwise the API error.
pub async fn destructive(
    ctx: &Context,
    pending: PendingAction,
    confirmed: bool,
) -> Result<(), CommandError> {
    if !confirmed {
        return Err(CommandError::NotAllowed(format!(
            "{} Re-run with --yes to confirm.",
            pending.prompt()
        )));
    }

    let board = loaded_board(ctx, None).await?;
    let order = match pending {
        PendingAction::Cancel { .. } => board.cancel(pending.confirm()).await?,
        PendingAction::Refund { .. } => board.refund(pending.confirm()).await?,
    };
    print_json(&order)
}

/// Build the pending cancellation.
#[must_use]
pub const fn cancellation(order_id: OrderId, reason: Option<String>) -> PendingAction {
    PendingAction::Cancel { order_id, reason }
}

/// Build the pending refund.
#[must_use]
pub const fn refund(order_id: OrderId, amount: Option<Price>) -> PendingAction {
    PendingAction::Refund { order_id, amount }
}

/// Attach a note to an order.
///
/// # Errors
///
/// Returns the API error.
pub async fn note(ctx: &Context, id: OrderId, text: &str) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.add_order_note(id, text).await?)
}
