//! Status enums for orders, users and checkout.
//!
//! Order status is a display of the backend's workflow, not an enforcement of
//! it: the happy path is `pending → confirmed → shipping → delivered`, and
//! `cancelled` is an absorbing side state reachable from any non-terminal
//! status. The server decides whether a transition is actually allowed.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the status enums from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

impl ParseStatusError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Order workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in workflow order with `Cancelled` last.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipping,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The single status a staff member may advance to from this one.
    ///
    /// `Delivered` and `Cancelled` have no successor.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Shipping),
            Self::Shipping => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether no further transition is offered.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the UI offers a cancel action.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    /// Wire value, as used in query strings and request bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipping => "Shipping",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the UI offers moving from this status to `target`: the next
    /// step, or a cancel.
    #[must_use]
    pub fn can_move_to(self, target: Self) -> bool {
        self.next() == Some(target) || (target == Self::Cancelled && self.can_cancel())
    }

    /// Button text for advancing *into* this status.
    ///
    /// `None` for statuses no advance leads to.
    #[must_use]
    pub const fn advance_label(self) -> Option<&'static str> {
        match self {
            Self::Confirmed => Some("Confirm order"),
            Self::Shipping => Some("Start shipping"),
            Self::Delivered => Some("Mark delivered"),
            Self::Pending | Self::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError::new("order status", s))
    }
}

/// Account role. Drives UI branching only; the server enforces authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Staff,
    #[default]
    Customer,
}

impl UserRole {
    /// Landing page for this role, used when a gate redirects a user away
    /// from a page their role may not see.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Staff => "/staff/dashboard",
            Self::Customer => "/",
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            _ => Err(ParseStatusError::new("user role", s)),
        }
    }
}

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    BankTransfer,
    CreditCard,
}

impl PaymentMethod {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::CreditCard => "CREDIT_CARD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "COD" => Ok(Self::Cod),
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            _ => Err(ParseStatusError::new("payment method", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_follows_happy_path() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::Confirmed.next(), Some(OrderStatus::Shipping));
        assert_eq!(OrderStatus::Shipping.next(), Some(OrderStatus::Delivered));
    }

    #[test]
    fn test_terminal_statuses_have_no_next() {
        assert_eq!(OrderStatus::Delivered.next(), None);
        assert_eq!(OrderStatus::Cancelled.next(), None);
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn test_cancel_reachable_from_every_open_status() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipping,
        ] {
            assert!(status.can_cancel(), "{status} should be cancellable");
        }
    }

    #[test]
    fn test_advance_labels_only_for_advance_targets() {
        for status in OrderStatus::ALL {
            let is_target = OrderStatus::ALL.iter().any(|s| s.next() == Some(status));
            assert_eq!(status.advance_label().is_some(), is_target, "{status}");
        }
        assert_eq!(OrderStatus::Pending.next().and_then(OrderStatus::advance_label), Some("Confirm order"));
        assert_eq!(OrderStatus::Delivered.next().and_then(OrderStatus::advance_label), None);
    }

    #[test]
    fn test_moves_are_next_step_or_cancel() {
        assert!(OrderStatus::Pending.can_move_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Shipping.can_move_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_move_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_move_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_move_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_move_to(OrderStatus::Pending));
    }

    #[test]
    fn test_order_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Shipping).unwrap();
        assert_eq!(json, "\"shipping\"");
        assert_eq!("Cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_role_home_paths() {
        assert_eq!(UserRole::Admin.home_path(), "/admin/dashboard");
        assert_eq!(UserRole::Staff.home_path(), "/staff/dashboard");
        assert_eq!(UserRole::Customer.home_path(), "/");
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cod".parse::<PaymentMethod>(), Ok(PaymentMethod::Cod));
        assert_eq!(
            "bank-transfer".parse::<PaymentMethod>(),
            Ok(PaymentMethod::BankTransfer)
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
    }
}
