//! Order board: the admin/staff orders page.

use emarket_core::{OrderId, OrderStatus, Price};
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use super::backend::OrderBackend;
use super::{Mirror, Snapshot};
use crate::error::ApiError;
use crate::listing::{OrderCounts, OrderListFilter, filter_orders};
use crate::types::Order;

const LOAD_FAILED: &str = "Could not load orders.";
const UPDATE_FAILED: &str = "Could not update the order.";

/// What a staff member can do to an order from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Move to the next status in the fulfilment flow.
    Advance,
    Cancel,
    Refund,
}

impl OrderAction {
    /// Cancel and refund need an explicit confirmation step.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Cancel | Self::Refund)
    }

    /// Actions offered for an order in `status`.
    #[must_use]
    pub fn available(status: OrderStatus) -> Vec<Self> {
        let mut actions = Vec::new();
        if status.next().is_some() {
            actions.push(Self::Advance);
        }
        if status.can_cancel() {
            actions.push(Self::Cancel);
        }
        if status != OrderStatus::Cancelled {
            actions.push(Self::Refund);
        }
        actions
    }
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Cancel {
        order_id: OrderId,
        reason: Option<String>,
    },
    Refund {
        order_id: OrderId,
        /// `None` refunds the full amount.
        amount: Option<Price>,
    },
}

impl PendingAction {
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        match self {
            Self::Cancel { order_id, .. } | Self::Refund { order_id, .. } => *order_id,
        }
    }

    #[must_use]
    pub const fn action(&self) -> OrderAction {
        match self {
            Self::Cancel { .. } => OrderAction::Cancel,
            Self::Refund { .. } => OrderAction::Refund,
        }
    }

    /// Question to put to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            Self::Cancel { order_id, .. } => format!("Cancel order #{order_id}?"),
            Self::Refund {
                order_id,
                amount: Some(amount),
            } => format!("Refund {} for order #{order_id}?", amount.format_vnd()),
            Self::Refund { order_id, .. } => format!("Refund order #{order_id} in full?"),
        }
    }

    /// The user said yes.
    #[must_use]
    pub fn confirm(self) -> Confirmation {
        Confirmation(self)
    }
}

/// Proof that a [`PendingAction`] was confirmed. Only
/// [`PendingAction::confirm`] creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation(PendingAction);

impl Confirmation {
    #[must_use]
    pub const fn pending(&self) -> &PendingAction {
        &self.0
    }
}

/// Orders list with status filter and per-status counters.
#[derive(Debug)]
pub struct OrderBoard<B> {
    backend: B,
    filter: RwLock<Option<OrderStatus>>,
    mirror: Mirror<Vec<Order>>,
}

impl<B: OrderBackend> OrderBoard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            filter: RwLock::new(None),
            mirror: Mirror::new(),
        }
    }

    /// Load orders, optionally only those in `status`. The filter is kept
    /// for the refetch after each mutation.
    #[instrument(skip(self))]
    pub async fn load(&self, status: Option<OrderStatus>) {
        *self.filter.write().await = status;
        self.refresh().await;
    }

    /// Reload with the current filter.
    pub async fn refresh(&self) {
        let status = *self.filter.read().await;
        let id = self.mirror.begin().await;
        let result = self.backend.fetch_orders(status).await.map_err(|e| {
            error!(error = %e, "failed to load orders");
            LOAD_FAILED.to_string()
        });
        self.mirror.finish(id, result).await;
    }

    /// Move an order to its next status.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` if the order isn't on the board or is already
    /// delivered or cancelled; otherwise the backend error.
    #[instrument(skip(self))]
    pub async fn advance(&self, order_id: OrderId) -> Result<Order, ApiError> {
        let status = self
            .mirror
            .read(|orders| orders.iter().find(|o| o.id == order_id).map(|o| o.status))
            .await
            .ok_or_else(|| ApiError::validation(format!("order #{order_id} is not loaded")))?;
        let next = status.next().ok_or_else(|| {
            ApiError::validation(format!("order #{order_id} is already {}", status.label()))
        })?;

        let result = self.backend.set_status(order_id, next).await;
        self.after_mutation(&result, "status updated").await;
        result
    }

    /// Cancel a confirmed cancellation.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` if the confirmation is for another action;
    /// otherwise the backend error.
    #[instrument(skip(self))]
    pub async fn cancel(&self, confirmation: Confirmation) -> Result<Order, ApiError> {
        let PendingAction::Cancel { order_id, reason } = confirmation.0 else {
            return Err(ApiError::validation("confirmation is not for a cancellation"));
        };
        let result = self.backend.cancel(order_id, reason.as_deref()).await;
        self.after_mutation(&result, "order cancelled").await;
        result
    }

    /// Refund a confirmed refund.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` if the confirmation is for another action;
    /// otherwise the backend error.
    #[instrument(skip(self))]
    pub async fn refund(&self, confirmation: Confirmation) -> Result<Order, ApiError> {
        let PendingAction::Refund { order_id, amount } = confirmation.0 else {
            return Err(ApiError::validation("confirmation is not for a refund"));
        };
        let result = self.backend.refund(order_id, amount).await;
        self.after_mutation(&result, "order refunded").await;
        result
    }

    /// Counters over the loaded orders.
    pub async fn status_counts(&self) -> OrderCounts {
        self.mirror.read(|orders| OrderCounts::from_orders(orders)).await
    }

    /// Loaded orders in `status`, or all for `None`.
    pub async fn filtered(&self, status: Option<OrderStatus>) -> Vec<Order> {
        self.mirror
            .read(|orders| filter_orders(orders, status).into_iter().cloned().collect())
            .await
    }

    /// Loaded orders passing the table filter.
    pub async fn matching(&self, filter: &OrderListFilter) -> Vec<Order> {
        self.mirror
            .read(|orders| filter.apply(orders).into_iter().cloned().collect())
            .await
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.mirror.read(Clone::clone).await
    }

    pub async fn snapshot(&self) -> Snapshot<Vec<Order>> {
        self.mirror.snapshot().await
    }

    async fn after_mutation(&self, result: &Result<Order, ApiError>, what: &str) {
        match result {
            Ok(order) => {
                info!(order_id = %order.id, status = %order.status, "{what}");
                self.refresh().await;
            }
            Err(e) => {
                error!(error = %e, "order update failed");
                self.refresh().await;
                self.mirror.set_error(UPDATE_FAILED).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::order::fixtures::order;
    use async_trait::async_trait;

    #[derive(Default)]
    struct MockOrders {
        orders: RwLock<Vec<Order>>,
        refunds: RwLock<Vec<(OrderId, Option<Price>)>>,
        reject: RwLock<bool>,
    }

    impl MockOrders {
        async fn with(orders: Vec<Order>) -> Self {
            let mock = Self::default();
            *mock.orders.write().await = orders;
            mock
        }

        async fn update(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
            if *self.reject.read().await {
                return Err(ApiError::Status {
                    status: reqwest::StatusCode::BAD_REQUEST,
                    message: "Cannot cancel shipped order".to_string(),
                });
            }
            let mut orders = self.orders.write().await;
            let order = orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| ApiError::validation("missing"))?;
            order.status = status;
            Ok(order.clone())
        }
    }

    #[async_trait]
    impl OrderBackend for MockOrders {
        async fn fetch_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError> {
            Ok(filter_orders(&self.orders.read().await, status)
                .into_iter()
                .cloned()
                .collect())
        }

        async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
            self.update(id, status).await
        }

        async fn cancel(&self, id: OrderId, _reason: Option<&str>) -> Result<Order, ApiError> {
            self.update(id, OrderStatus::Cancelled).await
        }

        async fn refund(&self, id: OrderId, amount: Option<Price>) -> Result<Order, ApiError> {
            self.refunds.write().await.push((id, amount));
            self.update(id, OrderStatus::Cancelled).await
        }
    }

    async fn board() -> OrderBoard<MockOrders> {
        let backend = MockOrders::with(vec![
            order(1, OrderStatus::Pending, 100),
            order(2, OrderStatus::Shipping, 200),
            order(3, OrderStatus::Delivered, 300),
            order(4, OrderStatus::Pending, 400),
        ])
        .await;
        let board = OrderBoard::new(backend);
        board.load(None).await;
        board
    }

    #[tokio::test]
    async fn test_counts_and_filter() {
        let board = board().await;
        let counts = board.status_counts().await;
        assert_eq!(counts.total, 4);
        assert_eq!(counts.pending, 2);

        let pending = board.filtered(Some(OrderStatus::Pending)).await;
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|o| o.status == OrderStatus::Pending));

        let filter = OrderListFilter {
            search: "ord-00004".to_string(),
            status: Some(OrderStatus::Pending),
            ..OrderListFilter::default()
        };
        let found = board.matching(&filter).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, OrderId::new(4));
    }

    #[tokio::test]
    async fn test_advance_follows_status_table() {
        let board = board().await;

        let order = board.advance(OrderId::new(1)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        let order = board.advance(OrderId::new(2)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);

        // refetched
        assert_eq!(board.status_counts().await.delivered, 2);

        let err = board.advance(OrderId::new(3)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_load_with_filter_is_kept_for_refetch() {
        let board = board().await;
        board.load(Some(OrderStatus::Pending)).await;
        assert_eq!(board.orders().await.len(), 2);

        board.advance(OrderId::new(4)).await.unwrap();
        let ids: Vec<_> = board.orders().await.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_cancel_needs_matching_confirmation() {
        let board = board().await;

        let refund = PendingAction::Refund {
            order_id: OrderId::new(1),
            amount: None,
        }
        .confirm();
        assert!(board.cancel(refund).await.is_err());

        let pending = PendingAction::Cancel {
            order_id: OrderId::new(1),
            reason: Some("customer request".to_string()),
        };
        assert_eq!(pending.prompt(), "Cancel order #1?");
        let order = board.cancel(pending.confirm()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(board.status_counts().await.cancelled, 1);
    }

    #[tokio::test]
    async fn test_rejected_refund_sets_error() {
        let board = board().await;
        *board.backend.reject.write().await = true;

        let pending = PendingAction::Refund {
            order_id: OrderId::new(3),
            amount: Some(Price::from_units(300)),
        };
        assert!(board.refund(pending.confirm()).await.is_err());
        assert_eq!(board.snapshot().await.error.as_deref(), Some(UPDATE_FAILED));
        assert_eq!(board.backend.refunds.read().await.len(), 1);
    }

    #[test]
    fn test_available_actions() {
        assert_eq!(
            OrderAction::available(OrderStatus::Pending),
            vec![OrderAction::Advance, OrderAction::Cancel, OrderAction::Refund]
        );
        assert_eq!(
            OrderAction::available(OrderStatus::Shipping),
            vec![OrderAction::Advance, OrderAction::Cancel, OrderAction::Refund]
        );
        assert_eq!(
            OrderAction::available(OrderStatus::Delivered),
            vec![OrderAction::Refund]
        );
        assert!(OrderAction::available(OrderStatus::Cancelled).is_empty());
        assert!(OrderAction::Refund.is_destructive());
        assert!(!OrderAction::Advance.is_destructive());
    }
}
