//! Dashboard and analytics shapes.

use std::collections::BTreeMap;
use std::fmt;

use emarket_core::{OrderStatus, Price, ProductId};
use serde::{Deserialize, Serialize};

/// Response of `GET /analytics/stats`. The only camelCase payload the
/// backend sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_revenue: Price,
    pub total_products: u64,
    pub total_users: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub shipping: u64,
    pub delivered: u64,
    pub cancelled: u64,
}

/// Bucket size for `GET /analytics/revenue`. The backend only groups daily
/// today; other periods come back empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevenuePeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl RevenuePeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RevenuePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RevenuePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown revenue period: {other}")),
        }
    }
}

/// One bucket of the revenue series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: String,
    pub revenue: Price,
    #[serde(default)]
    pub order_count: u64,
}

/// A best-selling product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub total_quantity: u64,
    pub total_revenue: Price,
}

/// Response of `GET /analytics/orders-by-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersByStatus {
    pub pending: u64,
    pub confirmed: u64,
    pub shipping: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub status_breakdown: BTreeMap<String, u64>,
}

impl OrdersByStatus {
    /// Count for one status.
    #[must_use]
    pub const fn count(&self, status: OrderStatus) -> u64 {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Confirmed => self.confirmed,
            OrderStatus::Shipping => self.shipping,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Cancelled => self.cancelled,
        }
    }
}

/// Response of `GET /admin/orders/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderStats {
    pub total_orders: u64,
    pub total_revenue: Price,
    pub pending: u64,
    pub confirmed: u64,
    pub shipping: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub status_breakdown: BTreeMap<String, u64>,
}

/// Response of `GET /admin/products/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductStats {
    pub total_products: u64,
    pub in_stock: u64,
    pub out_of_stock: u64,
    pub low_stock: u64,
    pub total_inventory_value: Price,
}

/// The staff dashboard summary, assembled client-side from three endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaffStats {
    pub total_products: u64,
    pub low_stock_products: u64,
    pub pending_orders: u64,
    pub confirmed_orders: u64,
    pub shipping_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    /// Not computed; the backend has no per-day revenue for staff.
    pub total_revenue_today: Price,
    pub total_revenue_month: Price,
}

/// What a [`RecentActivity`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Order,
    Product,
    Stock,
}

/// An entry of the staff activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_stats_are_camel_case() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalOrders": 12,
            "totalRevenue": 3_450_000.0,
            "totalProducts": 30,
            "totalUsers": 7,
            "pending": 2,
            "confirmed": 3,
            "shipping": 1,
            "delivered": 5,
            "cancelled": 1
        }))
        .unwrap();
        assert_eq!(stats.total_orders, 12);
        assert_eq!(stats.total_revenue, Price::from_units(3_450_000));
        assert_eq!(stats.delivered, 5);
    }

    #[test]
    fn test_orders_by_status_count() {
        let counts: OrdersByStatus = serde_json::from_value(serde_json::json!({
            "pending": 4,
            "shipping": 2,
            "status_breakdown": {"pending": 4, "shipping": 2}
        }))
        .unwrap();
        assert_eq!(counts.count(OrderStatus::Pending), 4);
        assert_eq!(counts.count(OrderStatus::Delivered), 0);
        assert_eq!(counts.status_breakdown.get("shipping"), Some(&2));
    }

    #[test]
    fn test_activity_kind_from_type_field() {
        let activity: RecentActivity = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "type": "stock",
            "message": "Stock updated",
            "timestamp": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(activity.kind, ActivityKind::Stock);
    }

    #[test]
    fn test_revenue_period_parse() {
        assert_eq!("Weekly".parse::<RevenuePeriod>(), Ok(RevenuePeriod::Weekly));
        assert!("yearly".parse::<RevenuePeriod>().is_err());
    }
}
