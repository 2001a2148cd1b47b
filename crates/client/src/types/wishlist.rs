//! Wishlist types.

use emarket_core::{ProductId, UserId, WishlistId};
use serde::{Deserialize, Serialize};

/// A wishlist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: WishlistId,
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// Response of `GET /wishlist/:user/check/:product`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WishlistCheck {
    pub is_in_wishlist: bool,
}

/// Body of `POST /wishlist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct AddToWishlist {
    pub product_id: ProductId,
}
