//! Fill execution logic
//!
//! Builds fill records with monotonically increasing sequence numbers and
//! the quote-leg fee from the pair's fee schedule.

use types::errors::OrderError;
use types::fee::FeeSchedule;
use types::fill::Fill;
use types::ids::{AccountId, OrderId, PairId};
use types::numeric::{Price, Quantity};
use types::order::Side;

/// Fill executor with sequence generation
#[derive(Debug)]
pub struct FillExecutor {
    sequence_counter: u64,
}

impl FillExecutor {
    /// Create a new executor with a starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence_counter;
        self.sequence_counter += 1;
        sequence
    }

    /// Execute a fill between a maker and a taker order
    ///
    /// The execution price is always the maker's limit price; the fee is
    /// charged on the quote value of the fill.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_fill(
        &mut self,
        pair_id: PairId,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker_account_id: AccountId,
        taker_account_id: AccountId,
        taker_side: Side,
        price: Price,
        quantity: Quantity,
        fee_schedule: &FeeSchedule,
        timestamp: i64,
    ) -> Result<Fill, OrderError> {
        // Self-trade prevention
        if maker_account_id == taker_account_id {
            return Err(OrderError::SelfTrade);
        }
        if quantity.is_zero() {
            return Err(OrderError::InvalidQuantity);
        }

        let fee = fee_schedule.fee_for(quantity.value_at(price));
        let sequence = self.next_sequence();

        Ok(Fill::new(
            sequence,
            pair_id,
            maker_order_id,
            taker_order_id,
            maker_account_id,
            taker_account_id,
            taker_side,
            price,
            quantity,
            fee,
            timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn execute(
        executor: &mut FillExecutor,
        maker: AccountId,
        taker: AccountId,
        fee_bps: u32,
    ) -> Result<Fill, OrderError> {
        executor.execute_fill(
            PairId::new(),
            OrderId::new(),
            OrderId::new(),
            maker,
            taker,
            Side::Buy,
            Price::from_u64(50_000),
            Quantity::from_str("0.5").unwrap(),
            &FeeSchedule::new(fee_bps, AccountId::new()),
            1_708_123_456_789_000_000,
        )
    }

    #[test]
    fn test_execute_fill() {
        let mut executor = FillExecutor::new(1_000);
        let fill = execute(&mut executor, AccountId::new(), AccountId::new(), 0).unwrap();

        assert_eq!(fill.sequence, 1_000);
        assert_eq!(fill.price, Price::from_u64(50_000));
        assert_eq!(fill.quantity, Quantity::from_str("0.5").unwrap());
        assert_eq!(fill.fee, Decimal::ZERO);
    }

    #[test]
    fn test_self_trade_prevention() {
        let mut executor = FillExecutor::new(1_000);
        let account = AccountId::new();
        let result = execute(&mut executor, account, account, 0);
        assert_eq!(result, Err(OrderError::SelfTrade));
    }

    #[test]
    fn test_sequence_monotonic() {
        let mut executor = FillExecutor::new(1_000);
        let first = execute(&mut executor, AccountId::new(), AccountId::new(), 0).unwrap();
        let second = execute(&mut executor, AccountId::new(), AccountId::new(), 0).unwrap();

        assert_eq!(first.sequence, 1_000);
        assert_eq!(second.sequence, 1_001);
    }

    #[test]
    fn test_fee_from_schedule() {
        let mut executor = FillExecutor::new(0);
        // 5 bps on quote value 25_000 = 12.5
        let fill = execute(&mut executor, AccountId::new(), AccountId::new(), 5).unwrap();
        assert_eq!(fill.fee, Decimal::new(125, 1));
    }
}
