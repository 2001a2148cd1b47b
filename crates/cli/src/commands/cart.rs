//! `emarket cart ...`
//!
//! Runs every mutation through [`CartStore`] so the printed cart is the
//! store's reconciled mirror.

use emarket_client::ApiClient;
use emarket_client::state::CartStore;
use emarket_client::types::{CartProduct, CheckoutDetails};
use emarket_core::{CartItemId, PaymentMethod, ProductId};
use serde_json::json;

use super::{CommandError, Context, print_json};

fn store(ctx: &Context) -> CartStore<ApiClient> {
    CartStore::new(ctx.api.clone())
}

async fn print_cart(store: &CartStore<ApiClient>) -> Result<(), CommandError> {
    let snapshot = store.snapshot().await;
    if let Some(message) = snapshot.error {
        return Err(CommandError::Failed(message));
    }
    let total = store.total().await;
    let item_count = store.item_count().await;
    print_json(&json!({
        "items": snapshot.data,
        "item_count": item_count,
        "total": total,
        "total_display": total.format_vnd(),
    }))
}

/// Show the cart.
///
/// # Errors
///
/// Returns an error if the cart can't be loaded.
pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let store = store(ctx);
    store.load_cart().await;
    print_cart(&store).await
}

/// Add a product, copying its name/price/image from the catalog.
///
/// # Errors
///
/// Returns an error if the product lookup or the add fails.
pub async fn add(ctx: &Context, product_id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let product = ctx.api.get_product(product_id).await?;
    let store = store(ctx);
    if !store
        .add_to_cart(product_id, quantity, &CartProduct::from(&product))
        .await
    {
        return Err(CommandError::Failed(
            store.error().await.unwrap_or_default(),
        ));
    }
    print_cart(&store).await
}

/// Remove a row.
///
/// # Errors
///
/// Returns the API error.
pub async fn remove(ctx: &Context, row: CartItemId) -> Result<(), CommandError> {
    let store = store(ctx);
    store.load_cart().await;
    store.remove_item(&row).await?;
    print_cart(&store).await
}

/// Change a row's quantity.
///
/// # Errors
///
/// Returns the API error, or a validation error for a zero quantity.
pub async fn update(ctx: &Context, row: CartItemId, quantity: u32) -> Result<(), CommandError> {
    let store = store(ctx);
    store.load_cart().await;
    store.update_quantity(&row, quantity).await?;
    print_cart(&store).await
}

/// Empty the cart on the server.
///
/// # Errors
///
/// Returns the API error.
pub async fn checkout(ctx: &Context) -> Result<(), CommandError> {
    store(ctx).checkout().await?;
    tracing::info!("cart checked out");
    Ok(())
}

/// Turn the cart into an order for the signed-in user.
///
/// # Errors
///
/// Returns an error if not signed in, the cart is empty, or the backend
/// refuses.
pub async fn place_order(
    ctx: &Context,
    shipping_address: String,
    payment_method: PaymentMethod,
) -> Result<(), CommandError> {
    ctx.require(&[])?;
    let customer = ctx.api.get_me().await?;

    let store = store(ctx);
    store.load_cart().await;
    let order = store
        .place_order(
            &customer,
            &CheckoutDetails {
                shipping_address,
                payment_method,
            },
        )
        .await?;

    if !order.total_matches_items() {
        tracing::warn!(
            order_id = %order.id,
            total = %order.total,
            items_total = %order.items_total(),
            "order total differs from its items"
        );
    }
    print_json(&order)
}
