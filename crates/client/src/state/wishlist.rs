//! Wishlist store.

use emarket_core::{ProductId, UserId};
use tracing::{error, instrument};

use super::backend::WishlistBackend;
use super::{Mirror, Snapshot};
use crate::error::ApiError;
use crate::types::Product;

const LOAD_FAILED: &str = "Could not load the wishlist.";
const UPDATE_FAILED: &str = "Could not update the wishlist.";

/// One user's wishlist.
#[derive(Debug)]
pub struct WishlistStore<B> {
    backend: B,
    user_id: UserId,
    mirror: Mirror<Vec<Product>>,
}

impl<B: WishlistBackend> WishlistStore<B> {
    pub fn new(backend: B, user_id: UserId) -> Self {
        Self {
            backend,
            user_id,
            mirror: Mirror::new(),
        }
    }

    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load(&self) {
        let id = self.mirror.begin().await;
        let result = self
            .backend
            .fetch_wishlist(self.user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to load wishlist");
                LOAD_FAILED.to_string()
            });
        self.mirror.finish(id, result).await;
    }

    /// Add the product if absent, remove it if present, then refetch.
    /// Returns whether the product is now on the wishlist.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording a message.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn toggle(&self, product_id: ProductId) -> Result<bool, ApiError> {
        let present = self.contains(product_id).await;
        let result = if present {
            self.backend
                .remove_from_wishlist(self.user_id, product_id)
                .await
        } else {
            self.backend.add_to_wishlist(self.user_id, product_id).await
        };

        if let Err(e) = result {
            error!(error = %e, "failed to toggle wishlist entry");
            self.mirror.set_error(UPDATE_FAILED).await;
            return Err(e);
        }
        self.load().await;
        Ok(!present)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording a message.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn remove(&self, product_id: ProductId) -> Result<(), ApiError> {
        match self
            .backend
            .remove_from_wishlist(self.user_id, product_id)
            .await
        {
            Ok(()) => {
                self.mirror
                    .apply(|products| products.retain(|p| p.id != product_id))
                    .await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to remove wishlist entry");
                self.mirror.set_error(UPDATE_FAILED).await;
                Err(e)
            }
        }
    }

    /// Whether the loaded wishlist holds the product.
    pub async fn contains(&self, product_id: ProductId) -> bool {
        self.mirror
            .read(|products| products.iter().any(|p| p.id == product_id))
            .await
    }

    pub async fn products(&self) -> Vec<Product> {
        self.mirror.read(Clone::clone).await
    }

    pub async fn snapshot(&self) -> Snapshot<Vec<Product>> {
        self.mirror.snapshot().await
    }
}
