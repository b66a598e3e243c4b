//! Fill execution records
//!
//! A fill is the partial or full execution of a taker order against one
//! maker order. Settlement is synchronous within the submitting call, so
//! unlike an asynchronous exchange there is no separate settlement state.

use crate::ids::{AccountId, FillId, OrderId, PairId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An executed fill between a maker and a taker order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub fill_id: FillId,
    /// Global monotonic fill sequence
    pub sequence: u64,
    pub pair_id: PairId,

    // Order references
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,

    // Account references
    pub maker_account_id: AccountId,
    pub taker_account_id: AccountId,

    /// Taker's side
    pub side: Side,
    /// Execution price: always the maker's limit price
    pub price: Price,
    pub quantity: Quantity,

    /// Quote-denominated fee charged against the seller's proceeds
    pub fee: Decimal,

    pub executed_at: i64,
}

impl Fill {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        pair_id: PairId,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker_account_id: AccountId,
        taker_account_id: AccountId,
        side: Side,
        price: Price,
        quantity: Quantity,
        fee: Decimal,
        executed_at: i64,
    ) -> Self {
        Self {
            fill_id: FillId::new(),
            sequence,
            pair_id,
            maker_order_id,
            taker_order_id,
            maker_account_id,
            taker_account_id,
            side,
            price,
            quantity,
            fee,
            executed_at,
        }
    }

    /// Quote value of the fill (price × quantity)
    pub fn quote_value(&self) -> Decimal {
        self.quantity.value_at(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fill() -> Fill {
        Fill::new(
            1_000,
            PairId::new(),
            OrderId::new(),
            OrderId::new(),
            AccountId::new(),
            AccountId::new(),
            Side::Buy,
            Price::from_u64(50_000),
            Quantity::from_str("0.5").unwrap(),
            Decimal::from(25),
            1_708_123_456_789_000_000,
        )
    }

    #[test]
    fn test_fill_quote_value() {
        assert_eq!(sample_fill().quote_value(), Decimal::from(25_000));
    }

    #[test]
    fn test_fill_serialization() {
        let fill = sample_fill();
        let json = serde_json::to_string(&fill).unwrap();
        let deserialized: Fill = serde_json::from_str(&json).unwrap();
        assert_eq!(fill, deserialized);
    }
}
