//! `OrderBoard` against the fake backend.

use emarket_client::ApiClient;
use emarket_client::state::{OrderAction, OrderBoard, PendingAction};
use emarket_core::{OrderId, OrderStatus};
use emarket_integration_tests::{ADMIN_EMAIL, CUSTOMER_EMAIL, FakeBackend};

async fn board_with(backend: &FakeBackend, statuses: &[&str]) -> (OrderBoard<ApiClient>, Vec<i32>) {
    let mut ids = Vec::new();
    for status in statuses {
        ids.push(backend.seed_order(status).await);
    }
    let board = OrderBoard::new(backend.signed_in(ADMIN_EMAIL).await);
    board.load(None).await;
    (board, ids)
}

#[tokio::test]
async fn test_counts_follow_loaded_orders() {
    let backend = FakeBackend::start().await;
    let (board, _) = board_with(&backend, &["pending", "pending", "shipping", "cancelled"]).await;

    let counts = board.status_counts().await;
    assert_eq!(counts.total, 4);
    assert_eq!(counts.pending, 2);
    assert_eq!(counts.shipping, 1);
    assert_eq!(counts.cancelled, 1);
    assert_eq!(board.filtered(Some(OrderStatus::Pending)).await.len(), 2);
}

#[tokio::test]
async fn test_advance_moves_one_step_and_refetches() {
    let backend = FakeBackend::start().await;
    let (board, ids) = board_with(&backend, &["pending"]).await;

    let order = board.advance(OrderId::new(ids[0])).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(backend.order_status(ids[0]).await.as_deref(), Some("confirmed"));
    assert_eq!(board.orders().await[0].status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_terminal_order_cannot_advance() {
    let backend = FakeBackend::start().await;
    let (board, ids) = board_with(&backend, &["delivered"]).await;

    let err = board.advance(OrderId::new(ids[0])).await.unwrap_err();
    assert!(matches!(err, emarket_client::ApiError::Validation(_)));
    assert_eq!(backend.order_status(ids[0]).await.as_deref(), Some("delivered"));
}

#[tokio::test]
async fn test_confirmed_cancellation_reaches_server() {
    let backend = FakeBackend::start().await;
    let (board, ids) = board_with(&backend, &["confirmed"]).await;

    let pending = PendingAction::Cancel {
        order_id: OrderId::new(ids[0]),
        reason: Some("customer request".to_string()),
    };
    let order = board.cancel(pending.confirm()).await.unwrap();

    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(board.status_counts().await.cancelled, 1);
}

#[tokio::test]
async fn test_refused_cancellation_sets_error() {
    let backend = FakeBackend::start().await;
    let (board, ids) = board_with(&backend, &["shipping"]).await;

    let pending = PendingAction::Cancel {
        order_id: OrderId::new(ids[0]),
        reason: None,
    };
    let err = board.cancel(pending.confirm()).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert_eq!(
        board.snapshot().await.error.as_deref(),
        Some("Could not update the order.")
    );
    assert_eq!(backend.order_status(ids[0]).await.as_deref(), Some("shipping"));
}

#[tokio::test]
async fn test_refund_of_delivered_order() {
    let backend = FakeBackend::start().await;
    let (board, ids) = board_with(&backend, &["delivered"]).await;

    let pending = PendingAction::Refund {
        order_id: OrderId::new(ids[0]),
        amount: None,
    };
    let order = board.refund(pending.confirm()).await.unwrap();
    assert_eq!(order.id, OrderId::new(ids[0]));
    assert!(board.snapshot().await.error.is_none());
}

#[tokio::test]
async fn test_refund_offered_and_accepted_before_delivery() {
    let backend = FakeBackend::start().await;
    let (board, ids) = board_with(&backend, &["shipping", "cancelled"]).await;

    assert!(OrderAction::available(OrderStatus::Shipping).contains(&OrderAction::Refund));
    assert!(!OrderAction::available(OrderStatus::Cancelled).contains(&OrderAction::Refund));

    let pending = PendingAction::Refund {
        order_id: OrderId::new(ids[0]),
        amount: None,
    };
    board.refund(pending.confirm()).await.unwrap();
    assert_eq!(backend.order_status(ids[0]).await.as_deref(), Some("cancelled"));

    let pending = PendingAction::Refund {
        order_id: OrderId::new(ids[1]),
        amount: None,
    };
    assert!(board.refund(pending.confirm()).await.is_err());
}

#[tokio::test]
async fn test_customer_cannot_load_board() {
    let backend = FakeBackend::start().await;
    backend.seed_order("pending").await;
    let board = OrderBoard::new(backend.signed_in(CUSTOMER_EMAIL).await);
    board.load(None).await;

    let snapshot = board.snapshot().await;
    assert_eq!(snapshot.error.as_deref(), Some("Could not load orders."));
    assert!(snapshot.data.is_empty());
}
