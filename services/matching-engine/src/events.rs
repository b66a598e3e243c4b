//! Engine events
//!
//! Append-only records emitted by [`crate::MatchingEngine`] for indexing
//! and audit. Side effects only, never control flow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::fill::Fill;
use types::ids::{AccountId, OrderId, PairId};
use types::numeric::{Price, Quantity};
use types::order::{Asset, Side};

/// An incoming order's unmatched remainder was placed in the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRested {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub pair_id: PairId,
    pub side: Side,
    pub price: Price,
    pub remaining_quantity: Quantity,
}

/// A maker and taker crossed; settlement already applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillExecuted {
    pub fill: Fill,
}

/// A resting order was removed and its remainder refunded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCanceled {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub side: Side,
    pub refunded: Decimal,
}

/// A trader pulled internal balance back out to the vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalCompleted {
    pub account_id: AccountId,
    pub asset: Asset,
    pub amount: Decimal,
}

/// The fee recipient collected accrued fees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeesWithdrawn {
    pub recipient: AccountId,
    pub base_amount: Decimal,
    pub quote_amount: Decimal,
}

/// Enum wrapper for all engine events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    OrderRested(OrderRested),
    FillExecuted(FillExecuted),
    OrderCanceled(OrderCanceled),
    WithdrawalCompleted(WithdrawalCompleted),
    FeesWithdrawn(FeesWithdrawn),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_rested_serialization() {
        let event = EngineEvent::OrderRested(OrderRested {
            order_id: OrderId::new(),
            account_id: AccountId::new(),
            pair_id: PairId::new(),
            side: Side::Buy,
            price: Price::from_u64(100),
            remaining_quantity: Quantity::from_u64(3),
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_withdrawal_event_serialization() {
        let event = EngineEvent::WithdrawalCompleted(WithdrawalCompleted {
            account_id: AccountId::new(),
            asset: Asset::Quote,
            amount: Decimal::from(750),
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }
}
