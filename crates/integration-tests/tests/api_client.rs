//! Transport behavior of `ApiClient` against the fake backend.

use emarket_client::types::{LoginRequest, Product};
use emarket_client::{ApiClient, ApiError, ClientConfig, Session};
use emarket_core::{ProductId, UserRole};
use emarket_integration_tests::{ADMIN_EMAIL, CUSTOMER_EMAIL, FakeBackend};
use secrecy::SecretString;

#[tokio::test]
async fn test_login_stores_session_and_attaches_bearer() {
    let backend = FakeBackend::start().await;
    let api = backend.signed_in(CUSTOMER_EMAIL).await;

    let user = api.session().user().expect("session user after login");
    assert_eq!(user.role, UserRole::Customer);

    let me = api.get_me().await.unwrap();
    assert_eq!(me.email, CUSTOMER_EMAIL);
    assert_eq!(
        backend.last_authorization().await.as_deref(),
        Some("Bearer token-1")
    );
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_authorization() {
    let backend = FakeBackend::start().await;
    let api = backend.client();

    let products = api.get_products().await.unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(backend.last_authorization().await, None);
}

#[tokio::test]
async fn test_rejected_login_leaves_session_empty() {
    let backend = FakeBackend::start().await;
    let api = backend.client();

    let request = LoginRequest {
        email: CUSTOMER_EMAIL.parse().unwrap(),
        password: "wrong".to_string(),
    };
    let err = api.login(&request).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(matches!(&err, ApiError::Status { message, .. } if message == "Incorrect email or password"));
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn test_missing_product_maps_detail() {
    let backend = FakeBackend::start().await;
    let err = backend
        .client()
        .get_product(ProductId::new(99))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "server returned 404 Not Found: Product not found");
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let backend = FakeBackend::start().await;
    let err = backend
        .client()
        .get::<Vec<Product>>("/broken")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_bare_product_array_becomes_page() {
    let backend = FakeBackend::start().await;
    let page = backend
        .client()
        .list_products(&emarket_client::types::ProductQuery::default())
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.products.len(), 3);

    let cap = page.products.iter().find(|p| p.id == ProductId::new(3)).unwrap();
    assert_eq!(cap.category_name(), Some("Phụ kiện"));
    let jeans = page.products.iter().find(|p| p.id == ProductId::new(2)).unwrap();
    assert_eq!(jeans.primary_image(), Some("/img/jean-1.jpg"));
}

#[tokio::test]
async fn test_admin_orders_page_object_is_kept() {
    let backend = FakeBackend::start().await;
    for status in ["pending", "shipping", "delivered"] {
        backend.seed_order(status).await;
    }
    let api = backend.signed_in(ADMIN_EMAIL).await;

    let page = api.admin_list_orders(0, 2, None).await.unwrap();
    assert_eq!(page.orders.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.limit, 2);

    let shipping = api
        .admin_list_orders(0, 100, Some(emarket_core::OrderStatus::Shipping))
        .await
        .unwrap();
    assert_eq!(shipping.orders.len(), 1);
}

#[tokio::test]
async fn test_configured_token_is_used_without_login() {
    let backend = FakeBackend::start().await;
    let config = ClientConfig::new(&backend.url())
        .unwrap()
        .with_token(SecretString::from("token-2"));
    let api = ApiClient::new(&config, Session::new()).unwrap();

    let me = api.get_me().await.unwrap();
    assert_eq!(me.role, UserRole::Admin);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let backend = FakeBackend::start().await;
    let api = backend.signed_in(CUSTOMER_EMAIL).await;

    api.logout().await.unwrap();
    assert!(!api.session().is_authenticated());

    let err = api.get_me().await.unwrap_err();
    assert!(err.is_unauthorized());
}
