//! `/analytics` endpoints.

use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{DashboardStats, OrdersByStatus, RevenuePeriod, RevenuePoint, TopProduct};

impl ApiClient {
    /// Headline counters for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/analytics/stats").await
    }

    /// Revenue series over the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn revenue(
        &self,
        period: RevenuePeriod,
        days: u32,
    ) -> Result<Vec<RevenuePoint>, ApiError> {
        self.get_with_query(
            "/analytics/revenue",
            &[("period", period.as_str().to_owned()), ("days", days.to_string())],
        )
        .await
    }

    /// Best sellers by quantity.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn top_products(&self, limit: u32) -> Result<Vec<TopProduct>, ApiError> {
        self.get_with_query("/analytics/top-products", &[("limit", limit.to_string())])
            .await
    }

    /// Order counts per status.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn orders_by_status(&self) -> Result<OrdersByStatus, ApiError> {
        self.get("/analytics/orders-by-status").await
    }
}
