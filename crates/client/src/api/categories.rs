//! `/categories` endpoints.

use emarket_core::CategoryId;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::Category;

impl ApiClient {
    /// Every category.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories").await
    }

    /// One category.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.get(&format!("/categories/{id}")).await
    }
}
