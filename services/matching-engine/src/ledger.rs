//! Balance ledger — escrowed value accounting for one pair
//!
//! Tracks three pools per pair: per-order locked escrow, per-trader
//! internal balances, and accrued fees. Every operation preserves the
//! conservation identity
//!
//! `custody pulled − custody pushed == locked + internal balances + fees`
//!
//! Fee policy (fixed): the fee is charged on the quote leg against the
//! seller's proceeds of every fill, regardless of which side was the
//! taker. A buy taker's price improvement is credited to its internal
//! quote balance during settlement, never left in custody.
//!
//! All arithmetic is checked; any mismatch between what an operation
//! expects and what is recorded aborts with an imbalance error rather
//! than applying a partial delta.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::errors::LedgerError;
use types::ids::{AccountId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{Asset, Side};

/// Internal escrow credits owed to a trader, disjoint from any value still
/// locked inside a resting order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderBalance {
    pub base: Decimal,
    pub quote: Decimal,
}

/// Accumulated fees for the pair, withdrawable only by the fee recipient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAccrual {
    pub base: Decimal,
    pub quote: Decimal,
}

/// Value locked against one resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Escrow {
    account_id: AccountId,
    side: Side,
    /// Quote-denominated for a buy, base-denominated for a sell
    amount: Decimal,
}

/// Per-pair balance ledger.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<AccountId, TraderBalance>,
    escrows: HashMap<OrderId, Escrow>,
    fees: FeeAccrual,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Escrow ─────────────────────────

    /// Record custody-pulled value as locked by a specific resting order.
    ///
    /// The amount is denominated by the order's side: quote for a buy,
    /// base for a sell.
    pub fn escrow(
        &mut self,
        order_id: OrderId,
        account_id: AccountId,
        side: Side,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if self.escrows.contains_key(&order_id) {
            return Err(LedgerError::AlreadyEscrowed { order_id });
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::ImbalanceDetected {
                detail: format!("escrow of non-positive amount {amount} for order {order_id}"),
            });
        }
        self.escrows.insert(
            order_id,
            Escrow {
                account_id,
                side,
                amount,
            },
        );
        Ok(())
    }

    /// Value currently locked for an order, if any.
    pub fn locked_for(&self, order_id: &OrderId) -> Option<Decimal> {
        self.escrows.get(order_id).map(|escrow| escrow.amount)
    }

    // ───────────────────────── Settlement ─────────────────────────

    /// Settle one fill at the maker's price.
    ///
    /// Consumes the maker's locked escrow, credits the seller's quote
    /// balance net of fee, credits the buyer's base balance, accrues the
    /// fee, and credits `buyer_surplus` (a buy taker's price improvement
    /// for this increment) to the buyer's quote balance.
    #[allow(clippy::too_many_arguments)]
    pub fn settle_fill(
        &mut self,
        maker_order_id: OrderId,
        maker_side: Side,
        buyer: AccountId,
        seller: AccountId,
        quantity: Quantity,
        price: Price,
        fee: Decimal,
        buyer_surplus: Decimal,
    ) -> Result<(), LedgerError> {
        let quote_amount = quantity.value_at(price);
        if fee.is_sign_negative() || fee > quote_amount {
            return Err(LedgerError::ImbalanceDetected {
                detail: format!("fee {fee} outside [0, {quote_amount}]"),
            });
        }
        if buyer_surplus.is_sign_negative() {
            return Err(LedgerError::ImbalanceDetected {
                detail: format!("negative buyer surplus {buyer_surplus}"),
            });
        }

        // The maker's escrow pays out its side of the fill
        let maker_cost = match maker_side {
            Side::Sell => quantity.as_decimal(),
            Side::Buy => quote_amount,
        };
        self.consume_escrow(maker_order_id, maker_cost)?;

        let seller_proceeds = quote_amount
            .checked_sub(fee)
            .ok_or(LedgerError::Overflow)?;
        self.credit(seller, Asset::Quote, seller_proceeds)?;
        self.credit(buyer, Asset::Base, quantity.as_decimal())?;
        self.fees.quote = self
            .fees
            .quote
            .checked_add(fee)
            .ok_or(LedgerError::Overflow)?;
        if buyer_surplus > Decimal::ZERO {
            self.credit(buyer, Asset::Quote, buyer_surplus)?;
        }
        Ok(())
    }

    // ───────────────────────── Cancellation ─────────────────────────

    /// Release an order's locked escrow back to the trader's internal
    /// balance.
    ///
    /// `expected` is the refund computed from the order's current
    /// `available_quantity`; it must equal the recorded escrow exactly.
    /// The escrow entry is removed, so a second cancel or stale reference
    /// cannot double-credit.
    pub fn refund_on_cancel(
        &mut self,
        order_id: OrderId,
        account_id: AccountId,
        side: Side,
        expected: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let escrow = self
            .escrows
            .get(&order_id)
            .copied()
            .ok_or(LedgerError::EscrowNotFound { order_id })?;

        if escrow.account_id != account_id || escrow.side != side || escrow.amount != expected {
            return Err(LedgerError::ImbalanceDetected {
                detail: format!(
                    "escrow for order {order_id} holds {}, refund expected {expected}",
                    escrow.amount
                ),
            });
        }

        self.credit(account_id, side.escrow_asset(), escrow.amount)?;
        self.escrows.remove(&order_id);
        Ok(escrow.amount)
    }

    // ───────────────────────── Withdrawal ─────────────────────────

    /// Internal balance available for withdrawal on one asset leg.
    pub fn withdrawable(&self, account_id: &AccountId, asset: Asset) -> Decimal {
        let balance = self.balances.get(account_id).copied().unwrap_or_default();
        match asset {
            Asset::Base => balance.base,
            Asset::Quote => balance.quote,
        }
    }

    /// Zero one leg of a trader's internal balance and return the amount
    /// for a custody push.
    pub fn take_withdrawal(
        &mut self,
        account_id: AccountId,
        asset: Asset,
    ) -> Result<Decimal, LedgerError> {
        let balance = self.balances.entry(account_id).or_default();
        let slot = match asset {
            Asset::Base => &mut balance.base,
            Asset::Quote => &mut balance.quote,
        };
        if slot.is_zero() {
            return Err(LedgerError::NothingToWithdraw);
        }
        Ok(std::mem::take(slot))
    }

    /// Zero the fee accrual and return `(base, quote)` amounts for custody
    /// pushes.
    pub fn take_fees(&mut self) -> Result<(Decimal, Decimal), LedgerError> {
        if self.fees.base.is_zero() && self.fees.quote.is_zero() {
            return Err(LedgerError::NothingToWithdraw);
        }
        let taken = self.fees;
        self.fees = FeeAccrual::default();
        Ok((taken.base, taken.quote))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// A trader's internal balances.
    pub fn balance_of(&self, account_id: &AccountId) -> TraderBalance {
        self.balances.get(account_id).copied().unwrap_or_default()
    }

    /// Accrued fees.
    pub fn fees(&self) -> FeeAccrual {
        self.fees
    }

    /// Sum of locked escrow per asset leg: `(base, quote)`.
    pub fn locked_totals(&self) -> (Decimal, Decimal) {
        self.escrows.values().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(base, quote), escrow| match escrow.side {
                Side::Sell => (base + escrow.amount, quote),
                Side::Buy => (base, quote + escrow.amount),
            },
        )
    }

    /// Sum of trader internal balances per asset leg: `(base, quote)`.
    pub fn balance_totals(&self) -> (Decimal, Decimal) {
        self.balances
            .values()
            .fold((Decimal::ZERO, Decimal::ZERO), |(base, quote), balance| {
                (base + balance.base, quote + balance.quote)
            })
    }

    // ───────────────────────── Internal ─────────────────────────

    fn credit(
        &mut self,
        account_id: AccountId,
        asset: Asset,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let balance = self.balances.entry(account_id).or_default();
        let slot = match asset {
            Asset::Base => &mut balance.base,
            Asset::Quote => &mut balance.quote,
        };
        *slot = slot.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    fn consume_escrow(&mut self, order_id: OrderId, amount: Decimal) -> Result<(), LedgerError> {
        let escrow = self
            .escrows
            .get_mut(&order_id)
            .ok_or(LedgerError::EscrowNotFound { order_id })?;
        if escrow.amount < amount {
            return Err(LedgerError::EscrowUnderflow {
                order_id,
                consume: amount,
                locked: escrow.amount,
            });
        }
        escrow.amount -= amount;
        if escrow.amount.is_zero() {
            self.escrows.remove(&order_id);
        }
        Ok(())
    }
}
