//! `CartStore` flows against the fake backend.

use emarket_client::ApiClient;
use emarket_client::state::CartStore;
use emarket_client::types::{CartProduct, CheckoutDetails};
use emarket_core::{OrderStatus, PaymentMethod, Price, ProductId};
use emarket_integration_tests::{CUSTOMER_EMAIL, FakeBackend};

async fn product(api: &ApiClient, id: i32) -> CartProduct {
    CartProduct::from(&api.get_product(ProductId::new(id)).await.unwrap())
}

async fn signed_in_store(backend: &FakeBackend) -> CartStore<ApiClient> {
    let store = CartStore::new(backend.signed_in(CUSTOMER_EMAIL).await);
    store.load_cart().await;
    store
}

#[tokio::test]
async fn test_adding_same_product_merges_rows() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let shirt = product(store.backend(), 1).await;

    assert!(store.add_to_cart(ProductId::new(1), 2, &shirt).await);
    assert!(store.add_to_cart(ProductId::new(1), 3, &shirt).await);

    let items = store.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
    assert_eq!(items[0].product_id, "1");
    assert_eq!(store.total().await, Price::from_units(750_000));
    assert_eq!(backend.cart_rows().await.len(), 1);
}

#[tokio::test]
async fn test_update_and_remove_reach_server() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let shirt = product(store.backend(), 1).await;
    let jeans = product(store.backend(), 2).await;
    store.add_to_cart(ProductId::new(1), 1, &shirt).await;
    store.add_to_cart(ProductId::new(2), 1, &jeans).await;

    let shirt_row = store.items().await[0].id.clone();
    store.update_quantity(&shirt_row, 4).await.unwrap();
    assert_eq!(store.item_count().await, 5);
    assert_eq!(backend.cart_rows().await[0]["quantity"], 4);

    store.remove_item(&shirt_row).await.unwrap();
    let items = store.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Quần jean");
    assert_eq!(backend.cart_rows().await.len(), 1);
}

#[tokio::test]
async fn test_failed_add_sets_error_and_keeps_rows() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let shirt = product(store.backend(), 1).await;
    store.add_to_cart(ProductId::new(1), 1, &shirt).await;

    backend.fail_cart_writes(true).await;
    assert!(!store.add_to_cart(ProductId::new(1), 1, &shirt).await);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.error.as_deref(), Some("Could not add the product to the cart."));
    assert_eq!(snapshot.data.len(), 1);
    assert_eq!(snapshot.data[0].quantity, 1);
}

#[tokio::test]
async fn test_failed_remove_reconciles_with_server() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let shirt = product(store.backend(), 1).await;
    store.add_to_cart(ProductId::new(1), 2, &shirt).await;
    let row = store.items().await[0].id.clone();

    backend.fail_cart_writes(true).await;
    let err = store.remove_item(&row).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));

    assert_eq!(store.items().await.len(), 1);
    assert_eq!(store.error().await.as_deref(), Some("Could not remove the product."));
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_locally() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let shirt = product(store.backend(), 1).await;
    store.add_to_cart(ProductId::new(1), 2, &shirt).await;
    let row = store.items().await[0].id.clone();

    let err = store.update_quantity(&row, 0).await.unwrap_err();
    assert!(matches!(err, emarket_client::ApiError::Validation(_)));
    assert_eq!(backend.cart_rows().await[0]["quantity"], 2);
}

#[tokio::test]
async fn test_place_order_submits_and_empties_cart() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let shirt = product(store.backend(), 1).await;
    let jeans = product(store.backend(), 2).await;
    store.add_to_cart(ProductId::new(1), 2, &shirt).await;
    store.add_to_cart(ProductId::new(2), 1, &jeans).await;

    let customer = store.backend().get_me().await.unwrap();
    let details = CheckoutDetails {
        shipping_address: "  12 Lê Lợi, Q1  ".to_string(),
        payment_method: PaymentMethod::Cod,
    };
    let order = store.place_order(&customer, &details).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.shipping_address, "12 Lê Lợi, Q1");
    assert_eq!(order.total, Price::from_units(650_000));
    assert!(order.total_matches_items());

    assert!(store.items().await.is_empty());
    assert!(backend.cart_rows().await.is_empty());
    assert_eq!(backend.order_count().await, 1);
}

#[tokio::test]
async fn test_empty_cart_cannot_be_ordered() {
    let backend = FakeBackend::start().await;
    let store = signed_in_store(&backend).await;
    let customer = store.backend().get_me().await.unwrap();

    let details = CheckoutDetails {
        shipping_address: "12 Lê Lợi".to_string(),
        payment_method: PaymentMethod::Cod,
    };
    assert!(store.place_order(&customer, &details).await.is_err());
    assert_eq!(backend.order_count().await, 0);
}

#[tokio::test]
async fn test_anonymous_load_reports_error() {
    let backend = FakeBackend::start().await;
    let store = CartStore::new(backend.client());
    store.load_cart().await;

    let snapshot = store.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error.as_deref(), Some("Could not load the cart."));
    assert!(snapshot.data.is_empty());
}
