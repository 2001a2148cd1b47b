//! Cart store.

use emarket_core::{CartItemId, Price, ProductId};
use tracing::{error, info, instrument};

use super::backend::CartBackend;
use super::{Mirror, Snapshot};
use crate::error::ApiError;
use crate::types::{CartItem, CartProduct, CheckoutDetails, Order, OrderCreate, OrderItem, User};

const LOAD_FAILED: &str = "Could not load the cart.";
const ADD_FAILED: &str = "Could not add the product to the cart.";
const REMOVE_FAILED: &str = "Could not remove the product.";
const UPDATE_FAILED: &str = "Could not update the quantity.";
const CHECKOUT_FAILED: &str = "Checkout failed.";
const ORDER_FAILED: &str = "Could not place the order.";

/// Local mirror of the server cart.
///
/// The server is authoritative. Adds are followed by a refetch so merged rows
/// come back exactly as the server holds them; removes and quantity changes
/// are applied locally once the server accepts them, and reconciled by a
/// refetch when it doesn't.
#[derive(Debug)]
pub struct CartStore<B> {
    backend: B,
    mirror: Mirror<Vec<CartItem>>,
}

impl<B: CartBackend> CartStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mirror: Mirror::new(),
        }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the local rows with the server's.
    #[instrument(skip(self))]
    pub async fn load_cart(&self) {
        let id = self.mirror.begin().await;
        let result = self.backend.fetch_cart().await.map_err(|e| {
            error!(error = %e, "failed to load cart");
            LOAD_FAILED.to_string()
        });
        self.mirror.finish(id, result).await;
    }

    /// Add `quantity` of a product, then refetch. Returns whether the add
    /// succeeded.
    #[instrument(skip(self, product))]
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32, product: &CartProduct) -> bool {
        if quantity == 0 {
            self.mirror.set_error("Quantity must be at least 1.").await;
            return false;
        }

        match self.backend.add_item(product_id, quantity, product).await {
            Ok(row) => {
                info!(row_id = %row.id, "added to cart");
                self.load_cart().await;
                true
            }
            Err(e) => {
                error!(error = %e, "failed to add to cart");
                self.mirror.set_error(ADD_FAILED).await;
                false
            }
        }
    }

    /// Remove the row with `id`.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording a message and refetching.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: &CartItemId) -> Result<(), ApiError> {
        match self.backend.remove_item(id).await {
            Ok(()) => {
                self.mirror.apply(|items| items.retain(|item| &item.id != id)).await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to remove cart row");
                self.reconcile(REMOVE_FAILED).await;
                Err(e)
            }
        }
    }

    /// Set the quantity of the row with `id`.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` for a quantity below 1, without calling the
    /// server. Otherwise the backend error, after recording a message and
    /// refetching.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, id: &CartItemId, quantity: u32) -> Result<(), ApiError> {
        if quantity < 1 {
            return Err(ApiError::validation("quantity must be at least 1"));
        }

        match self.backend.set_quantity(id, quantity).await {
            Ok(()) => {
                self.mirror
                    .apply(|items| {
                        if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
                            item.quantity = quantity;
                        }
                    })
                    .await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to update cart quantity");
                self.reconcile(UPDATE_FAILED).await;
                Err(e)
            }
        }
    }

    /// Check the server cart out and clear the local rows.
    ///
    /// # Errors
    ///
    /// Returns the backend error; local rows are kept.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<(), ApiError> {
        match self.backend.checkout().await {
            Ok(()) => {
                self.mirror.apply(Vec::clear).await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "checkout failed");
                self.mirror.set_error(CHECKOUT_FAILED).await;
                Err(e)
            }
        }
    }

    /// Turn the cart into an order for `customer`, then check the cart out.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` for an empty cart, a blank shipping address, or
    /// rows without a numeric product id. Otherwise the backend error. If the
    /// order is created but the checkout call fails, the order is still
    /// returned, the cart is reloaded and the store keeps a checkout error.
    #[instrument(skip(self, customer, details), fields(user_id = %customer.id))]
    pub async fn place_order(&self, customer: &User, details: &CheckoutDetails) -> Result<Order, ApiError> {
        if details.shipping_address.trim().is_empty() {
            return Err(ApiError::validation("shipping address is required"));
        }

        let rows = self.items().await;
        if rows.is_empty() {
            return Err(ApiError::validation("the cart is empty"));
        }
        let items = rows
            .iter()
            .map(|row| {
                OrderItem::from_cart_item(row).ok_or_else(|| {
                    ApiError::validation(format!("cart row {} has no catalog id", row.id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request = OrderCreate {
            user_id: customer.id,
            user_name: customer.full_name.clone(),
            user_email: Some(customer.email.clone()),
            items,
            shipping_address: details.shipping_address.trim().to_owned(),
            payment_method: details.payment_method,
        };

        let order = match self.backend.submit_order(&request).await {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "failed to create order");
                self.mirror.set_error(ORDER_FAILED).await;
                return Err(e);
            }
        };
        info!(order_id = %order.id, order_number = %order.order_number, "order placed");

        if self.checkout().await.is_err() {
            self.reconcile(CHECKOUT_FAILED).await;
        }
        Ok(order)
    }

    /// Current rows.
    pub async fn items(&self) -> Vec<CartItem> {
        self.mirror.read(Clone::clone).await
    }

    /// Σ price × quantity.
    pub async fn total(&self) -> Price {
        self.mirror
            .read(|items| items.iter().map(CartItem::line_total).sum())
            .await
    }

    /// Σ quantity.
    pub async fn item_count(&self) -> u32 {
        self.mirror
            .read(|items| items.iter().map(|item| item.quantity).sum())
            .await
    }

    pub async fn snapshot(&self) -> Snapshot<Vec<CartItem>> {
        self.mirror.snapshot().await
    }

    pub async fn loading(&self) -> bool {
        self.mirror.snapshot().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.mirror.snapshot().await.error
    }

    async fn reconcile(&self, message: &str) {
        self.load_cart().await;
        self.mirror.set_error(message).await;
    }
}
