//! `/wishlist` endpoints.

use emarket_core::{ProductId, UserId};
use reqwest::Method;
use tracing::{error, instrument};

use super::ApiClient;
use crate::error::ApiError;
use crate::types::wishlist::AddToWishlist;
use crate::types::{Product, WishlistCheck, WishlistEntry};

impl ApiClient {
    /// Add a product to a user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched (400 if already present).
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistEntry, ApiError> {
        self.request(
            Method::POST,
            "/wishlist",
            &[("user_id", user_id.to_string())],
            Some(&AddToWishlist { product_id }),
        )
        .await
    }

    /// Remove a product from a user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        self.send_empty::<()>(
            Method::DELETE,
            &format!("/wishlist/{user_id}/{product_id}"),
            &[],
            None,
        )
        .await
    }

    /// The products on a user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self, user_id: UserId) -> Result<Vec<Product>, ApiError> {
        self.get(&format!("/wishlist/{user_id}")).await
    }

    /// Whether a product is on the wishlist. `false` on any failure.
    #[instrument(skip(self))]
    pub async fn is_in_wishlist(&self, user_id: UserId, product_id: ProductId) -> bool {
        match self
            .get::<WishlistCheck>(&format!("/wishlist/{user_id}/check/{product_id}"))
            .await
        {
            Ok(check) => check.is_in_wishlist,
            Err(e) => {
                error!(error = %e, "failed to check wishlist");
                false
            }
        }
    }
}
