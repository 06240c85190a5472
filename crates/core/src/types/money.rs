//! Monetary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the platform currency (USD).
///
/// Amounts use decimal arithmetic end to end; the backend serializes them as
/// decimal strings, never floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in whole cents, as the payment processor expects.
    ///
    /// Fractions of a cent are truncated.
    #[must_use]
    pub fn as_cents(&self) -> i64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.0 * Decimal::from(100)).trunc().to_i64().unwrap_or(0)
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_from_cents() {
        let price = Money::from_cents(2500);
        assert_eq!(price.amount(), Decimal::new(2500, 2));
        assert_eq!(price.to_string(), "$25.00");
    }

    #[test]
    fn test_as_cents() {
        assert_eq!(Money::from_cents(999).as_cents(), 999);
        assert_eq!(Money::new(Decimal::new(1050, 2)).as_cents(), 1050);
    }

    #[test]
    fn test_is_positive() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::from_cents(0).is_positive());
        assert!(!Money::from_cents(-100).is_positive());
    }
}
