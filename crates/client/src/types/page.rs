//! List-response normalization.

use serde::Deserialize;

/// A list endpoint response that may be a bare array or a page object.
///
/// `/products` and `/admin/orders` return a bare JSON array today, but the
/// paginated variants of the same endpoints wrap the items in an object with
/// `total`/`page`/`limit`. Callers deserialize into `Listing` and normalize
/// with the page type's `from_listing`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T, P> {
    /// Bare JSON array.
    Items(Vec<T>),
    /// Page object.
    Page(P),
}

/// Generic acknowledgement body (`{"message": ..., "success": true}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}
