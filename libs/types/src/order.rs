//! Order lifecycle types

use crate::errors::OrderError;
use crate::ids::{AccountId, OrderId, PairId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// The asset leg a resting order of this side has in escrow
    pub fn escrow_asset(&self) -> Asset {
        match self {
            Side::Buy => Asset::Quote,
            Side::Sell => Asset::Base,
        }
    }
}

/// One leg of a pair: the base asset or the quote asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Base,
    Quote,
}

/// A limit order
///
/// `available_quantity` is the unfilled remainder and only ever decreases.
/// Invariant: `0 <= available_quantity <= quantity`, and an order present
/// in a price-level queue always has `available_quantity > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub pair_id: PairId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub available_quantity: Quantity,
    /// Creation sequence number, per pair, assigned by the engine
    pub sequence: u64,
    /// Logical expiry; `None` never expires. Checked at insertion only.
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: AccountId,
        pair_id: PairId,
        side: Side,
        price: Price,
        quantity: Quantity,
        sequence: u64,
        expires_at: Option<i64>,
        created_at: i64,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            account_id,
            pair_id,
            side,
            price,
            quantity,
            available_quantity: quantity,
            sequence,
            expires_at,
            created_at,
        }
    }

    /// Check the quantity invariant
    pub fn check_invariant(&self) -> bool {
        self.available_quantity <= self.quantity
    }

    /// Check if the order has no unfilled remainder
    pub fn is_filled(&self) -> bool {
        self.available_quantity.is_zero()
    }

    /// Check if the order is expired against a logical clock value
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }

    /// Reduce `available_quantity` by a fill
    ///
    /// Fails if the fill exceeds the unfilled remainder.
    pub fn fill(&mut self, fill_quantity: Quantity) -> Result<(), OrderError> {
        let remaining = self.available_quantity.checked_sub(fill_quantity).ok_or(
            OrderError::FillExceedsAvailable {
                fill: fill_quantity.as_decimal(),
                available: self.available_quantity.as_decimal(),
            },
        )?;
        self.available_quantity = remaining;
        Ok(())
    }

    /// Value still locked in escrow for this order
    ///
    /// Quote-denominated for a buy (`available * price`), base-denominated
    /// for a sell (`available`). Computed from the current remainder, never
    /// the original quantity.
    pub fn escrowed_value(&self) -> Decimal {
        match self.side {
            Side::Buy => self.available_quantity.value_at(self.price),
            Side::Sell => self.available_quantity.as_decimal(),
        }
    }
}
