//! Error taxonomy for the order book core
//!
//! Four classes of failure:
//! - validation errors ([`OrderError`] rejection variants): rejected before
//!   any state mutation;
//! - not-found errors (`NotFound`, `NothingToWithdraw`): rejected, no state
//!   change;
//! - invariant violations ([`QueueError`], [`BookError`], most of
//!   [`LedgerError`]): internal bugs that abort the whole call and are never
//!   silently tolerated;
//! - custody failures live in the custody crate and are wrapped by the
//!   engine's top-level error.

use crate::ids::OrderId;
use crate::numeric::Price;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from the per-level FIFO order queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("item already linked in queue: {order_id}")]
    ItemAlreadyExists { order_id: OrderId },

    #[error("queue is empty")]
    EmptyQueue,

    #[error("item not linked in queue: {order_id}")]
    ItemDoesNotExist { order_id: OrderId },
}

/// Errors from a side's price-level index
///
/// These indicate a broken book invariant, not a caller mistake.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("price level not present: {price}")]
    PriceNotFound { price: Price },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Order validation and lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid price: must be positive")]
    InvalidPrice,

    #[error("invalid quantity: must be positive")]
    InvalidQuantity,

    #[error("order expired at {expires_at}, clock is {now}")]
    Expired { expires_at: i64, now: i64 },

    #[error("order not found: {order_id}")]
    NotFound { order_id: OrderId },

    #[error("caller does not own order {order_id}")]
    NotOwner { order_id: OrderId },

    #[error("self-trade prevention triggered")]
    SelfTrade,

    #[error("fill of {fill} exceeds available {available}")]
    FillExceedsAvailable { fill: Decimal, available: Decimal },
}

/// Balance ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error("escrow already recorded for order {order_id}")]
    AlreadyEscrowed { order_id: OrderId },

    #[error("no escrow recorded for order {order_id}")]
    EscrowNotFound { order_id: OrderId },

    #[error("escrow underflow for order {order_id}: consuming {consume}, locked {locked}")]
    EscrowUnderflow {
        order_id: OrderId,
        consume: Decimal,
        locked: Decimal,
    },

    #[error("arithmetic overflow in balance calculation")]
    Overflow,

    #[error("ledger imbalance: {detail}")]
    ImbalanceDetected { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_display() {
        let id = OrderId::new();
        let err = QueueError::ItemAlreadyExists { order_id: id };
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(QueueError::EmptyQueue.to_string(), "queue is empty");
    }

    #[test]
    fn test_book_error_from_queue() {
        let err: BookError = QueueError::EmptyQueue.into();
        assert!(matches!(err, BookError::Queue(QueueError::EmptyQueue)));
    }

    #[test]
    fn test_order_error_display() {
        let err = OrderError::Expired {
            expires_at: 100,
            now: 200,
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::ImbalanceDetected {
            detail: "locked total drifted".to_string(),
        };
        assert!(err.to_string().contains("locked total drifted"));
    }
}
