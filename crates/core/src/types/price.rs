//! Type-safe price representation using decimal arithmetic.
//!
//! The backend stores prices as floats in Vietnamese dong and sends them as
//! JSON numbers. `Price` keeps them as [`Decimal`] on the client so cart and
//! order totals don't accumulate float error, and writes them back as numbers.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price in the store currency (VND).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of dong.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Approximate float value, for JSON bodies that carry an optional amount.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Format the way the storefront shows prices, e.g. `1.250.000 ₫`.
    ///
    /// Amounts are rounded to whole dong and grouped with `.`.
    #[must_use]
    pub fn format_vnd(&self) -> String {
        let rounded = self.0.round();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().trunc().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if negative {
            format!("-{grouped} ₫")
        } else {
            format!("{grouped} ₫")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_vnd())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_json_numbers() {
        let p: Price = serde_json::from_str("100000.0").unwrap();
        assert_eq!(p, Price::from_units(100_000));
        let p: Price = serde_json::from_str("250000").unwrap();
        assert_eq!(p, Price::from_units(250_000));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_units(50_000)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(50_000.0));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_units(100).times(3), Price::from_units(25).times(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(350));
    }

    #[test]
    fn test_format_vnd_groups_thousands() {
        assert_eq!(Price::from_units(0).format_vnd(), "0 ₫");
        assert_eq!(Price::from_units(999).format_vnd(), "999 ₫");
        assert_eq!(Price::from_units(1_250_000).format_vnd(), "1.250.000 ₫");
        assert_eq!(Price::new(Decimal::new(1_999_995, 1)).format_vnd(), "200.000 ₫");
    }
}
