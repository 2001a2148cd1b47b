//! `emarket stats ...`

use emarket_client::types::RevenuePeriod;
use emarket_core::OrderStatus;
use serde_json::json;

use super::{ADMIN_ONLY, BACK_OFFICE, CommandError, Context, print_json};

/// Admin dashboard counters.
///
/// # Errors
///
/// Returns the API error.
pub async fn dashboard(ctx: &Context) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.dashboard_stats().await?)
}

/// Revenue series.
///
/// # Errors
///
/// Returns the API error.
pub async fn revenue(ctx: &Context, period: RevenuePeriod, days: u32) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.revenue(period, days).await?)
}

/// Best sellers.
///
/// # Errors
///
/// Returns the API error.
pub async fn top_products(ctx: &Context, limit: u32) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    print_json(&ctx.api.top_products(limit).await?)
}

/// Order counts per status, with labels.
///
/// # Errors
///
/// Returns the API error.
pub async fn by_status(ctx: &Context) -> Result<(), CommandError> {
    ctx.require(ADMIN_ONLY)?;
    let counts = ctx.api.orders_by_status().await?;
    let rows: Vec<_> = OrderStatus::ALL
        .into_iter()
        .map(|status| json!({ "status": status, "label": status.label(), "count": counts.count(status) }))
        .collect();
    print_json(&rows)
}

/// Staff dashboard counters.
///
/// # Errors
///
/// Only fails to print; missing sources count as zero.
pub async fn staff(ctx: &Context) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.staff_stats().await)
}

/// Staff activity feed.
///
/// # Errors
///
/// Only fails to print.
pub async fn activities(ctx: &Context, limit: u32) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.recent_activities(limit).await)
}
