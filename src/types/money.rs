//! Monetary values for the ATM engine
//!
//! Amounts are exact decimal values over the smallest currency unit.
//! All arithmetic goes through checked operations; the ledger converts a
//! failed checked operation into a fatal error rather than saturating.
//! No binary floating point is used anywhere on the money path.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact monetary amount in smallest currency units
///
/// Thin wrapper over [`rust_decimal::Decimal`] providing only the
/// operations the engine needs: checked addition and subtraction,
/// ordering comparisons, and display formatting. Request amounts are
/// always non-negative; negative values can only appear transiently in
/// test construction and are rejected by the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create an amount from a count of smallest currency units
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Checked addition; `None` on overflow
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction; `None` on overflow
    ///
    /// A result below zero is representable; callers that require a
    /// non-negative result must check for it explicitly.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// True if the amount is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// True if the amount is strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Money)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_units_preserves_value() {
        assert_eq!(Money::from_units(0), Money::ZERO);
        assert_eq!(Money::from_units(1_000_000).to_string(), "1000000");
    }

    #[test]
    fn checked_add_is_exact() {
        let a = Money::from_units(4_000_000);
        let b = Money::from_units(1_000_000);
        assert_eq!(a.checked_add(b), Some(Money::from_units(5_000_000)));
    }

    #[test]
    fn checked_sub_allows_negative_result() {
        let a = Money::from_units(100);
        let b = Money::from_units(250);
        let diff = a.checked_sub(b).unwrap();
        assert!(diff.is_negative());
        assert_eq!(diff, Money::from_units(-150));
    }

    #[test]
    fn ordering() {
        assert!(Money::from_units(100) < Money::from_units(200));
        assert!(Money::from_units(200) >= Money::from_units(200));
        assert!(Money::from_units(-1) < Money::ZERO);
    }

    #[test]
    fn positivity() {
        assert!(Money::from_units(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::from_units(-1).is_positive());
    }

    #[test]
    fn parses_from_decimal_string() {
        let amount: Money = "5000000".parse().unwrap();
        assert_eq!(amount, Money::from_units(5_000_000));
    }
}
