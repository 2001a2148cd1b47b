//! Staff dashboard and order desk.
//!
//! The staff dashboard has no endpoint of its own; [`ApiClient::staff_stats`]
//! assembles it from the analytics, product and order listings.

use chrono::{DateTime, Datelike, Utc};
use emarket_core::{OrderStatus, Price};
use tracing::{error, instrument};

use super::ApiClient;
use crate::error::ApiError;
use crate::types::product::LOW_STOCK_THRESHOLD;
use crate::types::{
    DashboardStats, Listing, Order, OrderFilter, OrderPage, Product, ProductPage, RecentActivity,
    StaffStats,
};

/// How many rows the dashboard pulls to count products and monthly revenue.
const DASHBOARD_SCAN_LIMIT: u32 = 1000;

impl ApiClient {
    /// Filtered order listing for the staff order desk.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderPage, ApiError> {
        let listing: Listing<Order, OrderPage> =
            self.get_with_query("/admin/orders", &filter.pairs()).await?;
        Ok(OrderPage::from_listing(listing, filter.page, filter.limit))
    }

    /// Staff dashboard counters.
    ///
    /// The three source calls run concurrently. Each one that fails is logged
    /// and contributes zeros; this never fails as a whole.
    #[instrument(skip(self))]
    pub async fn staff_stats(&self) -> StaffStats {
        let scan = [("limit", DASHBOARD_SCAN_LIMIT.to_string())];
        let (analytics, products, orders) = tokio::join!(
            self.get::<DashboardStats>("/analytics/stats"),
            self.get_with_query::<Listing<Product, ProductPage>>("/products", &scan),
            self.get_with_query::<Listing<Order, OrderPage>>("/admin/orders", &scan),
        );

        let analytics = analytics
            .inspect_err(|e| error!(error = %e, "failed to fetch analytics"))
            .ok();
        let products = products
            .inspect_err(|e| error!(error = %e, "failed to fetch products"))
            .ok()
            .map(|listing| match listing {
                Listing::Items(items) => items,
                Listing::Page(page) => page.products,
            });
        let orders = orders
            .inspect_err(|e| error!(error = %e, "failed to fetch orders"))
            .ok()
            .map(|listing| match listing {
                Listing::Items(items) => items,
                Listing::Page(page) => page.orders,
            });

        summarize(
            analytics.as_ref(),
            products.as_deref(),
            orders.as_deref(),
            Utc::now(),
        )
    }

    /// Latest staff activity feed entries. Empty on any failure.
    #[instrument(skip(self))]
    pub async fn recent_activities(&self, limit: u32) -> Vec<RecentActivity> {
        self.get_with_query("/staff/activities", &[("limit", limit.to_string())])
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "failed to fetch recent activities");
                Vec::new()
            })
    }
}

/// Combine whatever sources arrived into the dashboard counters.
pub(crate) fn summarize(
    analytics: Option<&DashboardStats>,
    products: Option<&[Product]>,
    orders: Option<&[Order]>,
    now: DateTime<Utc>,
) -> StaffStats {
    let analytics = analytics.cloned().unwrap_or_default();
    let products = products.unwrap_or_default();

    let total_revenue_month = orders
        .unwrap_or_default()
        .iter()
        .filter(|order| {
            order.status != OrderStatus::Cancelled
                && order.created_at.year() == now.year()
                && order.created_at.month() == now.month()
        })
        .map(|order| order.total)
        .sum();

    StaffStats {
        total_products: products.len() as u64,
        low_stock_products: products
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .count() as u64,
        pending_orders: analytics.pending,
        confirmed_orders: analytics.confirmed,
        shipping_orders: analytics.shipping,
        delivered_orders: analytics.delivered,
        cancelled_orders: analytics.cancelled,
        total_revenue_today: Price::ZERO,
        total_revenue_month,
    }
}
