//! `/products` endpoints.

use emarket_core::ProductId;
use tracing::{error, instrument};

use super::{ApiClient, segment};
use crate::error::ApiError;
use crate::types::{Listing, Product, ProductDraft, ProductPage, ProductPatch, ProductQuery};

/// Number of related products the detail page shows.
const RELATED_LIMIT: u32 = 4;

impl ApiClient {
    /// Every product.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/products").await
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get(&format!("/products/{id}")).await
    }

    /// Up to four products related to `id`. Empty on any failure.
    #[instrument(skip(self))]
    pub async fn get_related_products(&self, id: ProductId) -> Vec<Product> {
        self.get_with_query(
            &format!("/products/{id}/related"),
            &[("limit", RELATED_LIMIT.to_string())],
        )
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "failed to fetch related products");
            Vec::new()
        })
    }

    /// Full-text product search. Empty on any failure.
    #[instrument(skip(self))]
    pub async fn search_products(&self, q: &str) -> Vec<Product> {
        self.get_with_query("/products/search", &[("q", q.to_owned())])
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "failed to search products");
                Vec::new()
            })
    }

    /// Products in a category, by name. Empty on any failure.
    #[instrument(skip(self))]
    pub async fn get_products_by_category(&self, category: &str) -> Vec<Product> {
        self.get(&format!("/products/category/{}", segment(category)))
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "failed to fetch products by category");
                Vec::new()
            })
    }

    /// Paginated listing. A bare-array response is normalized into a page.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let listing: Listing<Product, ProductPage> =
            self.get_with_query("/products", &query.pairs()).await?;
        Ok(ProductPage::from_listing(listing, query))
    }

    /// Create a product through the staff endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the draft is incomplete, otherwise
    /// the API error untouched.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        draft.check().map_err(ApiError::Validation)?;
        self.post("/products", draft).await
    }

    /// Update a product through the staff endpoint.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        self.put(&format!("/products/{id}"), patch).await
    }

    /// Delete a product through the staff endpoint.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.send_empty::<()>(reqwest::Method::DELETE, &format!("/products/{id}"), &[], None)
            .await
    }

    /// Set a product's stock count (`PATCH /products/:id/stock`).
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn update_product_stock(&self, id: ProductId, stock: u32) -> Result<Product, ApiError> {
        self.patch(
            &format!("/products/{id}/stock"),
            &serde_json::json!({ "stock": stock }),
        )
        .await
    }
}
