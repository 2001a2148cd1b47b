//! Request and response shapes for the emarket REST API.
//!
//! These mirror the backend's JSON; the backend owns every entity, so the
//! client never treats them as authoritative. Where the backend is
//! inconsistent (category as string or object, list endpoints returning a bare
//! array or a page object) the types here absorb the difference.

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod category;
pub mod order;
pub mod page;
pub mod product;
pub mod user;
pub mod wishlist;

pub use analytics::{
    ActivityKind, DashboardStats, OrderStats, OrdersByStatus, ProductStats, RecentActivity,
    RevenuePeriod, RevenuePoint, StaffStats, TopProduct,
};
pub use auth::{AuthToken, LoginRequest, RegisterRequest, Registered};
pub use cart::{AddToCart, CartItem, CartProduct};
pub use category::{Category, CategoryDraft, CategoryPatch};
pub use order::{
    CheckoutDetails, Order, OrderCreate, OrderFilter, OrderItem, OrderPage, OrderStatusUpdate,
};
pub use page::{Ack, Listing};
pub use product::{
    CategoryRef, ImageUpload, Product, ProductDraft, ProductPage, ProductPatch, ProductQuery,
    StockLevel,
};
pub use user::{
    ChangePassword, CreateUserResponse, NewUser, PasswordChange, User, UserPatch, UserUpdate,
};
pub use wishlist::{WishlistCheck, WishlistEntry};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
///
/// The backend sends `"images": null` for products without a gallery.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
