//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Both types are non-negative by construction; operations that could go
//! negative return checked results instead of wrapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use thiserror::Error;

/// Errors constructing numeric values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("value must not be negative: {value}")]
    Negative { value: Decimal },

    #[error("unparseable decimal: {input}")]
    Unparseable { input: String },
}

/// A limit price expressed in quote units per base unit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price. Not a valid limit; used as the empty-book sentinel.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse from a decimal string, rejecting negative values
    pub fn from_str(input: &str) -> Result<Self, NumericError> {
        let value = Decimal::from_str_exact(input).map_err(|_| NumericError::Unparseable {
            input: input.to_string(),
        })?;
        Self::try_new(value)
    }

    /// Wrap a decimal, rejecting negative values
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value.is_sign_negative() {
            return Err(NumericError::Negative { value });
        }
        Ok(Self(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An order quantity expressed in base units
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse from a decimal string, rejecting negative values
    pub fn from_str(input: &str) -> Result<Self, NumericError> {
        let value = Decimal::from_str_exact(input).map_err(|_| NumericError::Unparseable {
            input: input.to_string(),
        })?;
        Self::try_new(value)
    }

    /// Wrap a decimal, rejecting negative values
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value.is_sign_negative() {
            return Err(NumericError::Negative { value });
        }
        Ok(Self(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtraction that fails on underflow rather than going negative
    pub fn checked_sub(&self, other: Quantity) -> Option<Quantity> {
        let result = self.0.checked_sub(other.0)?;
        if result.is_sign_negative() {
            return None;
        }
        Some(Self(result))
    }

    /// The smaller of two quantities
    pub fn min(self, other: Quantity) -> Quantity {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Quote value of this quantity at the given price
    pub fn value_at(&self, price: Price) -> Decimal {
        self.0 * price.as_decimal()
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, other: Quantity) -> Quantity {
        Self(self.0 + other.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_ordering() {
        let low = Price::from_u64(49_000);
        let high = Price::from_u64(50_000);
        assert!(low < high);
        assert_eq!(high, Price::from_str("50000").unwrap());
    }

    #[test]
    fn test_price_rejects_negative() {
        assert!(matches!(
            Price::from_str("-1"),
            Err(NumericError::Negative { .. })
        ));
        assert!(Price::from_str("not a number").is_err());
    }

    #[test]
    fn test_quantity_checked_sub() {
        let a = Quantity::from_str("2.5").unwrap();
        let b = Quantity::from_str("1.0").unwrap();
        assert_eq!(a.checked_sub(b), Some(Quantity::from_str("1.5").unwrap()));
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn test_quantity_min() {
        let a = Quantity::from_u64(3);
        let b = Quantity::from_u64(7);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), a);
    }

    #[test]
    fn test_quantity_value_at() {
        let qty = Quantity::from_str("0.5").unwrap();
        let price = Price::from_u64(50_000);
        assert_eq!(qty.value_at(price), Decimal::from(25_000));
    }

    #[test]
    fn test_quantity_add() {
        let a = Quantity::from_str("1.5").unwrap();
        let b = Quantity::from_str("2.5").unwrap();
        assert_eq!(a + b, Quantity::from_str("4.0").unwrap());
    }

    #[test]
    fn test_serialization_round_trip() {
        let price = Price::from_str("3000.50").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn checked_sub_never_goes_negative(a in 0u64..1_000_000, b in 0u64..1_000_000) {
                let qa = Quantity::from_u64(a);
                let qb = Quantity::from_u64(b);
                match qa.checked_sub(qb) {
                    Some(diff) => prop_assert_eq!(diff + qb, qa),
                    None => prop_assert!(a < b),
                }
            }

            #[test]
            fn value_at_is_exact_product(qty in 1u64..100_000, price in 1u64..100_000) {
                let value = Quantity::from_u64(qty).value_at(Price::from_u64(price));
                prop_assert_eq!(value, Decimal::from(qty) * Decimal::from(price));
            }
        }
    }
}
