//! Order types.

use chrono::{DateTime, Utc};
use emarket_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, Price, ProductId, UserId};
use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::null_as_default;
use super::page::Listing;
use super::product::{DEFAULT_PAGE_LIMIT, default_limit, first_page};

/// A line of an order: a snapshot of the product at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderItemId>,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// Snapshot a cart row. `None` if the row's product reference isn't a
    /// numeric catalog id.
    #[must_use]
    pub fn from_cart_item(item: &CartItem) -> Option<Self> {
        Some(Self {
            id: None,
            product_id: item.catalog_id()?,
            product_name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
            image: Some(item.image.clone()).filter(|s| !s.is_empty()),
        })
    }
}

/// An order as returned by the order service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(with = "emarket_core::types::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "emarket_core::types::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Σ `price * quantity` over the items.
    #[must_use]
    pub fn items_total(&self) -> Price {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Whether the server-supplied `total` equals [`Self::items_total`].
    ///
    /// Informational only; the displayed total is always the server's.
    #[must_use]
    pub fn total_matches_items(&self) -> bool {
        self.items_total() == self.total
    }

    /// Σ quantity over the items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// What the shopper fills in at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutDetails {
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCreate {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub items: Vec<OrderItem>,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
}

/// Body of the status-update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Staff order listing filter. Unset fields are left off the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderFilter {
    /// Query pairs in the order the backend documents them.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let text = |key: &'static str, value: Option<&String>| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.clone()))
        };

        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        pairs.extend(text("start_date", self.start_date.as_ref()));
        pairs.extend(text("end_date", self.end_date.as_ref()));
        pairs.extend(text("search", self.search.as_ref()));
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// A page of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl OrderPage {
    /// Normalize either response shape into a page.
    #[must_use]
    pub fn from_listing(listing: Listing<Order, Self>, page: Option<u32>, limit: Option<u32>) -> Self {
        match listing {
            Listing::Page(page) => page,
            Listing::Items(orders) => Self {
                total: orders.len(),
                orders,
                page: page.filter(|p| *p > 0).unwrap_or(1),
                limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_LIMIT),
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A minimal order with one line, for tests across the crate.
    pub fn order(id: i32, status: OrderStatus, total: i64) -> Order {
        let created = emarket_core::types::timestamp::parse("2024-05-01T09:30:00").unwrap_or_default();
        Order {
            id: OrderId::new(id),
            order_number: format!("ORD-{id:05}"),
            user_id: UserId::new(1),
            user_name: None,
            user_email: None,
            items: vec![OrderItem {
                id: None,
                product_id: ProductId::new(1),
                product_name: "Item".to_string(),
                quantity: 1,
                price: Price::from_units(total),
                image: None,
            }],
            total: Price::from_units(total),
            status,
            shipping_address: "1 Le Loi, District 1".to_string(),
            payment_method: "COD".to_string(),
            created_at: created,
            updated_at: created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_backend_json() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 5,
            "order_number": "ORD-20240501-0005",
            "user_id": 3,
            "user_name": null,
            "user_email": "b@shop.vn",
            "shipping_address": "12 Nguyen Hue",
            "payment_method": "COD",
            "total": 150000.0,
            "status": "confirmed",
            "created_at": "2024-05-01T09:30:00.123456",
            "updated_at": "2024-05-02T10:00:00",
            "items": [
                {"id": 1, "product_id": 7, "product_name": "Cap", "quantity": 2, "price": 50000.0, "image": null},
                {"id": 2, "product_id": 8, "product_name": "Pin", "quantity": 1, "price": 50000.0}
            ]
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.item_count(), 3);
        assert!(order.total_matches_items());
    }

    #[test]
    fn test_total_mismatch_is_reported_not_fixed() {
        let mut order = fixtures::order(1, OrderStatus::Pending, 100_000);
        order.total = Price::from_units(90_000);
        assert!(!order.total_matches_items());
        assert_eq!(order.total, Price::from_units(90_000));
    }

    #[test]
    fn test_order_item_from_cart_row() {
        let row = CartItem {
            id: "cart-1".into(),
            product_id: "42".to_string(),
            name: "Scarf".to_string(),
            price: Price::from_units(80_000),
            quantity: 2,
            image: String::new(),
        };
        let item = OrderItem::from_cart_item(&row).unwrap();
        assert_eq!(item.product_id, ProductId::new(42));
        assert_eq!(item.image, None);

        let bad = CartItem {
            product_id: "sku-42".to_string(),
            ..row
        };
        assert!(OrderItem::from_cart_item(&bad).is_none());
    }

    #[test]
    fn test_filter_pairs() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Shipping),
            search: Some("ORD".to_string()),
            limit: Some(50),
            ..OrderFilter::default()
        };
        assert_eq!(
            filter.pairs(),
            vec![
                ("status", "shipping".to_string()),
                ("search", "ORD".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_update_body() {
        let body = OrderStatusUpdate {
            status: OrderStatus::Delivered,
            note: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "delivered"})
        );
    }
}
