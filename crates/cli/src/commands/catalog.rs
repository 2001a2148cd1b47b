//! `emarket products ...` and `emarket categories ...`

use emarket_client::listing::{ProductFilter, ProductSort, StockFilter, category_names};
use emarket_client::types::{Product, ProductDraft, ProductPatch, ProductQuery};
use emarket_core::{CategoryId, ProductId};

use super::{BACK_OFFICE, CommandError, Context, print_json};

/// Client-side narrowing applied on top of the server listing.
#[derive(Debug, Default)]
pub struct Narrowing {
    pub stock: StockFilter,
    pub sort: Option<ProductSort>,
}

/// Paginated product listing.
///
/// # Errors
///
/// Returns the API error.
pub async fn list(ctx: &Context, query: &ProductQuery, narrowing: &Narrowing) -> Result<(), CommandError> {
    let mut page = ctx.api.list_products(query).await?;

    let filter = ProductFilter {
        stock: narrowing.stock,
        ..ProductFilter::default()
    };
    let mut view = filter.apply(&page.products);
    if let Some(sort) = narrowing.sort {
        sort.sort(&mut view);
    }
    let products: Vec<Product> = view.into_iter().cloned().collect();
    page.products = products;
    print_json(&page)
}

/// One product.
///
/// # Errors
///
/// Returns the API error.
pub async fn show(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    print_json(&ctx.api.get_product(id).await?)
}

/// Products related to one product.
///
/// # Errors
///
/// Only fails to print.
pub async fn related(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    print_json(&ctx.api.get_related_products(id).await)
}

/// Full-text search.
///
/// # Errors
///
/// Only fails to print.
pub async fn search(ctx: &Context, q: &str) -> Result<(), CommandError> {
    print_json(&ctx.api.search_products(q).await)
}

/// Products in one category.
///
/// # Errors
///
/// Only fails to print.
pub async fn by_category(ctx: &Context, category: &str) -> Result<(), CommandError> {
    print_json(&ctx.api.get_products_by_category(category).await)
}

/// Category names in use across the catalog.
///
/// # Errors
///
/// Returns the API error.
pub async fn category_names_in_use(ctx: &Context) -> Result<(), CommandError> {
    let products = ctx.api.get_products().await?;
    print_json(&category_names(&products))
}

/// Create a product (staff).
///
/// # Errors
///
/// Returns the API error.
pub async fn create(ctx: &Context, draft: &ProductDraft) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.create_product(draft).await?)
}

/// Update a product (staff).
///
/// # Errors
///
/// Returns the API error.
pub async fn update(ctx: &Context, id: ProductId, patch: &ProductPatch) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.update_product(id, patch).await?)
}

/// Delete a product (staff).
///
/// # Errors
///
/// Returns the API error.
pub async fn delete(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    ctx.api.delete_product(id).await?;
    tracing::info!(%id, "product deleted");
    Ok(())
}

/// Set a product's stock (staff).
///
/// # Errors
///
/// Returns the API error.
pub async fn set_stock(ctx: &Context, id: ProductId, stock: u32) -> Result<(), CommandError> {
    ctx.require(BACK_OFFICE)?;
    print_json(&ctx.api.update_product_stock(id, stock).await?)
}

/// All categories.
///
/// # Errors
///
/// Returns the API error.
pub async fn categories(ctx: &Context) -> Result<(), CommandError> {
    print_json(&ctx.api.get_categories().await?)
}

/// One category.
///
/// # Errors
///
/// Returns the API error.
pub async fn category(ctx: &Context, id: CategoryId) -> Result<(), CommandError> {
    print_json(&ctx.api.get_category(id).await?)
}
