//! `/admin` endpoints: catalog, orders and user management.
//!
//! All of these require an admin token; the server enforces it.

use emarket_core::{CategoryId, OrderId, OrderStatus, Price, ProductId, UserId, UserRole};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::{info, instrument};

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{
    Category, CategoryDraft, CategoryPatch, CreateUserResponse, ImageUpload, Listing, NewUser,
    Order, OrderPage, OrderStats, OrderStatusUpdate, Product, ProductDraft, ProductPatch,
    ProductStats, User, UserPatch,
};

/// Page size of the admin order and user tables.
pub const ADMIN_PAGE_LIMIT: u32 = 100;

impl ApiClient {
    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the draft is incomplete, otherwise
    /// the API error untouched.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn admin_create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        draft.check().map_err(ApiError::Validation)?;
        self.post("/admin/products", draft).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, patch))]
    pub async fn admin_update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        self.put(&format!("/admin/products/{id}"), patch).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn admin_delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::DELETE, &format!("/admin/products/{id}"), &[], None)
            .await
    }

    /// Upload a product image as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` for an unparsable MIME type, otherwise
    /// the API error untouched.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_product_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageUpload, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_owned())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let upload: ImageUpload = self
            .post_multipart("/admin/products/upload-image", form)
            .await?;
        info!(image_url = %upload.image_url, "image uploaded");
        Ok(upload)
    }

    /// Set stock through the admin endpoint (`PUT ...?stock=`).
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn admin_set_stock(&self, id: ProductId, stock: u32) -> Result<Product, ApiError> {
        self.request::<Product, ()>(
            Method::PUT,
            &format!("/admin/products/{id}/stock"),
            &[("stock", stock.to_string())],
            None,
        )
        .await
    }

    /// Catalog stock summary.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn product_stats(&self) -> Result<ProductStats, ApiError> {
        self.get("/admin/products/stats").await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank name, otherwise the API
    /// error untouched.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn admin_create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::validation("category name is required"));
        }
        self.post("/admin/categories", draft).await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, patch))]
    pub async fn admin_update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, ApiError> {
        self.put(&format!("/admin/categories/{id}"), patch).await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn admin_delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::DELETE, &format!("/admin/categories/{id}"), &[], None)
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// One window of all orders, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn admin_list_orders(
        &self,
        skip: u32,
        limit: u32,
        status: Option<OrderStatus>,
    ) -> Result<OrderPage, ApiError> {
        let mut query = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_owned()));
        }

        let listing: Listing<Order, OrderPage> =
            self.get_with_query("/admin/orders", &query).await?;
        let page = skip.checked_div(limit).map(|p| p + 1);
        Ok(OrderPage::from_listing(listing, page, Some(limit)))
    }

    /// Change an order's status with an optional note.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, note))]
    pub async fn admin_update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Order, ApiError> {
        let body = OrderStatusUpdate {
            status,
            note: note.map(str::to_owned),
        };
        self.put(&format!("/admin/orders/{id}/status"), &body).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched (400 once shipped).
    #[instrument(skip(self, reason))]
    pub async fn cancel_order(&self, id: OrderId, reason: Option<&str>) -> Result<Order, ApiError> {
        self.post(
            &format!("/admin/orders/{id}/cancel"),
            &json!({ "reason": reason }),
        )
        .await
    }

    /// Refund an order, in full when `amount` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn refund_order(&self, id: OrderId, amount: Option<Price>) -> Result<Order, ApiError> {
        self.post(
            &format!("/admin/orders/{id}/refund"),
            &json!({ "amount": amount }),
        )
        .await
    }

    /// Order totals by status.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn order_stats(&self) -> Result<OrderStats, ApiError> {
        self.get("/admin/orders/stats").await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// One window of all users.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn list_users(&self, skip: u32, limit: u32) -> Result<Vec<User>, ApiError> {
        self.get_with_query(
            "/admin/users",
            &[("skip", skip.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Create a customer or staff account. The response carries the
    /// generated temporary password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank name or admin role,
    /// otherwise the API error untouched.
    #[instrument(skip(self, user), fields(email = %user.email, role = %user.role))]
    pub async fn create_user(&self, user: &NewUser) -> Result<CreateUserResponse, ApiError> {
        user.check().map_err(ApiError::Validation)?;
        self.post("/admin/users", user).await
    }

    /// Update another user's details.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<User, ApiError> {
        self.put(&format!("/admin/users/{id}"), patch).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::DELETE, &format!("/admin/users/{id}"), &[], None)
            .await
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn set_user_role(&self, id: UserId, role: UserRole) -> Result<User, ApiError> {
        self.put(&format!("/admin/users/{id}/role"), &json!({ "role": role }))
            .await
    }

    /// Activate or deactivate a user.
    ///
    /// # Errors
    ///
    /// Returns the API error untouched.
    #[instrument(skip(self))]
    pub async fn set_user_active(&self, id: UserId, is_active: bool) -> Result<User, ApiError> {
        self.put(
            &format!("/admin/users/{id}/status"),
            &json!({ "is_active": is_active }),
        )
        .await
    }
}
