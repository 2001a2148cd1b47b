//! `/cart` endpoints.
//!
//! The cart lives on the server, keyed by the session. Rows are identified by
//! the string id the cart service assigns, not by product.

use emarket_core::{CartItemId, ProductId};
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, segment};
use crate::error::ApiError;
use crate::types::{Ack, AddToCart, CartItem, CartProduct};

impl ApiClient {
    /// The current cart rows.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.get("/cart").await
    }

    /// Add `quantity` of a product. The server merges into an existing row
    /// for the same product.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, product))]
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
        product: &CartProduct,
    ) -> Result<CartItem, ApiError> {
        self.post("/cart", &AddToCart::new(product_id, quantity, product))
            .await
    }

    /// Remove a row.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched (404 if the row is gone).
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, id: &CartItemId) -> Result<Ack, ApiError> {
        self.delete(&format!("/cart/{}", segment(id.as_str()))).await
    }

    /// Set a row's quantity.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn update_cart_item_quantity(
        &self,
        id: &CartItemId,
        quantity: u32,
    ) -> Result<Ack, ApiError> {
        self.put(
            &format!("/cart/{}", segment(id.as_str())),
            &serde_json::json!({ "quantity": quantity }),
        )
        .await
    }

    /// Empty the server cart after an order has been placed.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn checkout_cart(&self) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::POST, "/cart/checkout", &[], None)
            .await
    }
}
