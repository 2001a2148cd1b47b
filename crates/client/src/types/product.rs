//! Catalog types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use emarket_core::{CategoryId, Price, ProductId};
use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::page::Listing;

/// Stock below this count (and above zero) is shown as "low stock".
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Page size assumed when the backend returns a bare array.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// A product's category as the backend happens to send it.
///
/// The product service stores a plain string; joined responses embed the
/// category object. Both normalize to the category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Object {
        #[serde(default)]
        id: Option<CategoryId>,
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl CategoryRef {
    /// The category name, whichever shape it arrived in.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Object { name, .. } => name,
        }
    }
}

impl From<&str> for CategoryRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

/// Coarse stock classification used by badges and stock filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    /// Classify a stock count.
    #[must_use]
    pub const fn of(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock < LOW_STOCK_THRESHOLD {
            Self::Low
        } else {
            Self::InStock
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews_count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specifications: BTreeMap<String, String>,
    #[serde(default, with = "emarket_core::types::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "emarket_core::types::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Normalized category name; `None` when absent or blank.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(CategoryRef::name)
            .filter(|name| !name.trim().is_empty())
    }

    /// Whether the product belongs to `category`, comparing normalized names.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category_name() == Some(category)
    }

    /// Stock classification.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::of(self.stock)
    }

    /// Main image, falling back to the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.images.first().map(String::as_str))
    }
}

/// Body for creating a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub specifications: BTreeMap<String, String>,
}

impl ProductDraft {
    /// Required-field check done by the product forms before submitting.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first missing field.
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name is required".to_string());
        }
        if self.price <= Price::ZERO {
            return Err("product price must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Partial product update. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Paginated product listing parameters. Unset fields are left off the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

impl ProductQuery {
    /// Query pairs in the order the backend documents them.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_owned()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("category", category.to_owned()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sort", sort.to_owned()));
        }
        pairs
    }
}

/// A page of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ProductPage {
    /// Normalize either response shape into a page.
    ///
    /// A bare array becomes one page holding everything, numbered from the
    /// query (or 1) with the query's limit (or 20).
    #[must_use]
    pub fn from_listing(listing: Listing<Product, Self>, query: &ProductQuery) -> Self {
        match listing {
            Listing::Page(page) => page,
            Listing::Items(products) => Self {
                total: products.len(),
                products,
                page: query.page.filter(|p| *p > 0).unwrap_or(1),
                limit: query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_LIMIT),
            },
        }
    }
}

/// Response of the admin image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub image_url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

pub(crate) const fn first_page() -> u32 {
    1
}

pub(crate) const fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_json(category: &serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "name": "Runner",
            "description": "Light running shoe",
            "price": 1_200_000.0,
            "stock": 5,
            "category": category,
            "images": null,
            "specifications": null
        })
    }

    #[test]
    fn test_category_string_and_object_normalize_the_same() {
        let bare: Product = serde_json::from_value(product_json(&serde_json::json!("Shoes"))).unwrap();
        let nested: Product = serde_json::from_value(product_json(
            &serde_json::json!({"id": 4, "name": "Shoes", "description": "Footwear"}),
        ))
        .unwrap();

        assert_eq!(bare.category_name(), Some("Shoes"));
        assert_eq!(nested.category_name(), Some("Shoes"));
        assert!(bare.in_category("Shoes"));
        assert!(nested.in_category("Shoes"));
        assert!(!nested.in_category("Bags"));
    }

    #[test]
    fn test_nulls_become_empty_collections() {
        let product: Product = serde_json::from_value(product_json(&serde_json::Value::Null)).unwrap();
        assert!(product.images.is_empty());
        assert!(product.specifications.is_empty());
        assert_eq!(product.category_name(), None);
    }

    #[test]
    fn test_blank_category_is_none() {
        let product: Product = serde_json::from_value(product_json(&serde_json::json!(""))).unwrap();
        assert_eq!(product.category_name(), None);
    }

    #[test]
    fn test_stock_levels() {
        assert_eq!(StockLevel::of(0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::of(1), StockLevel::Low);
        assert_eq!(StockLevel::of(9), StockLevel::Low);
        assert_eq!(StockLevel::of(10), StockLevel::InStock);
    }

    #[test]
    fn test_bare_array_normalizes_to_page() {
        let listing: Listing<Product, ProductPage> = serde_json::from_value(serde_json::json!([
            product_json(&serde_json::json!("Shoes")),
            product_json(&serde_json::json!("Bags")),
        ]))
        .unwrap();
        let query = ProductQuery {
            page: Some(3),
            ..ProductQuery::default()
        };

        let page = ProductPage::from_listing(listing, &query);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_object_passes_through() {
        let listing: Listing<Product, ProductPage> = serde_json::from_value(serde_json::json!({
            "products": [product_json(&serde_json::json!("Shoes"))],
            "total": 41,
            "page": 2,
            "limit": 1
        }))
        .unwrap();

        let page = ProductPage::from_listing(listing, &ProductQuery::default());
        assert_eq!(page.total, 41);
        assert_eq!(page.page, 2);
        assert_eq!(page.products.len(), 1);
    }

    #[test]
    fn test_query_pairs_skip_empty_values() {
        let query = ProductQuery {
            page: Some(0),
            limit: Some(50),
            search: Some(String::new()),
            category: Some("Shoes".to_string()),
            sort: None,
        };
        assert_eq!(
            query.pairs(),
            vec![("limit", "50".to_string()), ("category", "Shoes".to_string())]
        );
    }

    #[test]
    fn test_draft_check() {
        let mut draft = ProductDraft {
            name: "Tote".to_string(),
            price: Price::from_units(150_000),
            ..ProductDraft::default()
        };
        assert!(draft.check().is_ok());
        draft.name = "  ".to_string();
        assert!(draft.check().is_err());
    }
}
