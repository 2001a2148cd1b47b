//! The server operations each store depends on.
//!
//! [`ApiClient`] implements all of them; tests substitute in-memory fakes.

use async_trait::async_trait;
use emarket_core::{CartItemId, OrderId, OrderStatus, Price, ProductId, UserId};

use crate::api::{ADMIN_PAGE_LIMIT, ApiClient};
use crate::error::ApiError;
use crate::types::{
    CartItem, CartProduct, ChangePassword, Order, OrderCreate, Product, User, UserUpdate,
};

/// Cart and order placement, as used by [`CartStore`](super::CartStore).
#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError>;

    async fn add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        product: &CartProduct,
    ) -> Result<CartItem, ApiError>;

    async fn remove_item(&self, id: &CartItemId) -> Result<(), ApiError>;

    async fn set_quantity(&self, id: &CartItemId, quantity: u32) -> Result<(), ApiError>;

    async fn checkout(&self) -> Result<(), ApiError>;

    async fn submit_order(&self, order: &OrderCreate) -> Result<Order, ApiError>;
}

/// Order desk operations, as used by [`OrderBoard`](super::OrderBoard).
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn fetch_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError>;

    async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError>;

    async fn cancel(&self, id: OrderId, reason: Option<&str>) -> Result<Order, ApiError>;

    async fn refund(&self, id: OrderId, amount: Option<Price>) -> Result<Order, ApiError>;
}

/// Profile operations, as used by [`ProfileStore`](super::ProfileStore).
#[async_trait]
pub trait ProfileBackend: Send + Sync {
    async fn fetch_profile(&self) -> Result<User, ApiError>;

    async fn save_profile(&self, update: &UserUpdate) -> Result<User, ApiError>;

    async fn change_password(&self, request: &ChangePassword) -> Result<(), ApiError>;

    /// End the session. Must clear local credentials even when the server
    /// call fails.
    async fn sign_out(&self) -> Result<(), ApiError>;
}

/// Wishlist operations, as used by [`WishlistStore`](super::WishlistStore).
#[async_trait]
pub trait WishlistBackend: Send + Sync {
    async fn fetch_wishlist(&self, user_id: UserId) -> Result<Vec<Product>, ApiError>;

    async fn add_to_wishlist(&self, user_id: UserId, product_id: ProductId) -> Result<(), ApiError>;

    async fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl CartBackend for ApiClient {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.get_cart().await
    }

    async fn add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        product: &CartProduct,
    ) -> Result<CartItem, ApiError> {
        self.add_to_cart(product_id, quantity, product).await
    }

    async fn remove_item(&self, id: &CartItemId) -> Result<(), ApiError> {
        self.remove_cart_item(id).await.map(drop)
    }

    async fn set_quantity(&self, id: &CartItemId, quantity: u32) -> Result<(), ApiError> {
        self.update_cart_item_quantity(id, quantity).await.map(drop)
    }

    async fn checkout(&self) -> Result<(), ApiError> {
        self.checkout_cart().await
    }

    async fn submit_order(&self, order: &OrderCreate) -> Result<Order, ApiError> {
        self.create_order(order).await
    }
}

#[async_trait]
impl OrderBackend for ApiClient {
    async fn fetch_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError> {
        Ok(self
            .admin_list_orders(0, ADMIN_PAGE_LIMIT, status)
            .await?
            .orders)
    }

    async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.admin_update_order_status(id, status, None).await
    }

    async fn cancel(&self, id: OrderId, reason: Option<&str>) -> Result<Order, ApiError> {
        self.cancel_order(id, reason).await
    }

    async fn refund(&self, id: OrderId, amount: Option<Price>) -> Result<Order, ApiError> {
        self.refund_order(id, amount).await
    }
}

#[async_trait]
impl ProfileBackend for ApiClient {
    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get_me().await
    }

    async fn save_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.update_me(update).await
    }

    async fn change_password(&self, request: &ChangePassword) -> Result<(), ApiError> {
        Self::change_password(self, request).await.map(drop)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.logout().await
    }
}

#[async_trait]
impl WishlistBackend for ApiClient {
    async fn fetch_wishlist(&self, user_id: UserId) -> Result<Vec<Product>, ApiError> {
        self.get_wishlist(user_id).await
    }

    async fn add_to_wishlist(&self, user_id: UserId, product_id: ProductId) -> Result<(), ApiError> {
        Self::add_to_wishlist(self, user_id, product_id).await.map(drop)
    }

    async fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        Self::remove_from_wishlist(self, user_id, product_id).await
    }
}
