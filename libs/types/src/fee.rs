//! Fee schedule types
//!
//! Fees are expressed in parts per `FEE_DENOMINATOR` (basis points) and are
//! charged on the quote leg of every fill. Accrued fees are withdrawable
//! only by the pair's fee recipient.

use crate::ids::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed fee denominator: rates are basis points (1 bps = 0.01%)
pub const FEE_DENOMINATOR: u32 = 10_000;

/// Per-pair fee parameters
///
/// Set at pair creation and mutable by the registry admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee rate in basis points, at most [`FEE_DENOMINATOR`]
    pub fee_bps: u32,
    /// Account entitled to withdraw accrued fees
    pub recipient: AccountId,
}

impl FeeSchedule {
    pub fn new(fee_bps: u32, recipient: AccountId) -> Self {
        Self { fee_bps, recipient }
    }

    /// Fee owed on a quote-denominated trade value
    ///
    /// `fee = quote_amount * fee_bps / FEE_DENOMINATOR`, exact in decimal
    /// arithmetic. Always `0 <= fee <= quote_amount` for valid rates.
    pub fn fee_for(&self, quote_amount: Decimal) -> Decimal {
        quote_amount * Decimal::from(self.fee_bps) / Decimal::from(FEE_DENOMINATOR)
    }

    /// Whether the rate is within the valid range
    pub fn is_valid(&self) -> bool {
        self.fee_bps <= FEE_DENOMINATOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_calculation() {
        // 30 bps on 100_000 quote = 300
        let schedule = FeeSchedule::new(30, AccountId::new());
        assert_eq!(schedule.fee_for(Decimal::from(100_000)), Decimal::from(300));
    }

    #[test]
    fn test_zero_fee() {
        let schedule = FeeSchedule::new(0, AccountId::new());
        assert_eq!(schedule.fee_for(Decimal::from(100_000)), Decimal::ZERO);
    }

    #[test]
    fn test_full_fee_bounds() {
        let schedule = FeeSchedule::new(FEE_DENOMINATOR, AccountId::new());
        assert!(schedule.is_valid());
        assert_eq!(schedule.fee_for(Decimal::from(250)), Decimal::from(250));

        let invalid = FeeSchedule::new(FEE_DENOMINATOR + 1, AccountId::new());
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_fee_exact_fraction() {
        // 5 bps on 50_000 = 25, no rounding residue
        let schedule = FeeSchedule::new(5, AccountId::new());
        assert_eq!(schedule.fee_for(Decimal::from(50_000)), Decimal::from(25));
    }
}
