//! `/orders` endpoints.

use emarket_core::{OrderId, OrderStatus, UserId};
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{Order, OrderCreate, OrderStatusUpdate};

impl ApiClient {
    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an order without items or shipping
    /// address, otherwise the API error untouched.
    #[instrument(skip(self, order), fields(user_id = %order.user_id, items = order.items.len()))]
    pub async fn create_order(&self, order: &OrderCreate) -> Result<Order, ApiError> {
        if order.items.is_empty() {
            return Err(ApiError::validation("an order needs at least one item"));
        }
        if order.shipping_address.trim().is_empty() {
            return Err(ApiError::validation("shipping address is required"));
        }
        self.post("/orders", order).await
    }

    /// One order.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{id}")).await
    }

    /// A customer's orders.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_user_orders(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        self.get(&format!("/orders/user/{user_id}")).await
    }

    /// Overwrite an order's status (`PUT /orders/:id`).
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.put(
            &format!("/orders/{id}"),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    /// Staff status change with an optional note (`PUT /orders/:id/status`).
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, note))]
    pub async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Order, ApiError> {
        let body = OrderStatusUpdate {
            status,
            note: note.map(str::to_owned),
        };
        self.put(&format!("/orders/{id}/status"), &body).await
    }

    /// Attach a staff note to an order.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, note))]
    pub async fn add_order_note(&self, id: OrderId, note: &str) -> Result<Order, ApiError> {
        self.post(
            &format!("/orders/{id}/notes"),
            &serde_json::json!({ "note": note }),
        )
        .await
    }
}
