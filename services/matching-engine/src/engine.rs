//! Matching engine core
//!
//! One engine instance serves one pair. Submission runs in three phases:
//! validate, plan fills read-only, then pull custody and commit. Every
//! fallible step precedes the first state mutation, so a rejected call
//! leaves the book, the ledger, and the vault exactly as they were.
//!
//! Matching is strict price-time priority: the opposite side is walked
//! best price first, FIFO within each level, and every fill executes at
//! the resting order's price. A buy taker's price improvement is credited
//! to its internal quote balance during settlement.

use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use custody::errors::{RegistryError, VaultError};
use custody::registry::{PairRegistry, PairSpec};
use custody::vault::Vault;
use types::errors::{BookError, LedgerError, OrderError};
use types::fill::Fill;
use types::ids::{AccountId, OrderId, PairId};
use types::numeric::{Price, Quantity};
use types::order::{Asset, Order, Side};

use crate::book::{AskBook, BidBook, OrderQueue};
use crate::events::{
    EngineEvent, FeesWithdrawn, FillExecuted, OrderCanceled, OrderRested, WithdrawalCompleted,
};
use crate::ledger::BalanceLedger;
use crate::matching::crossing::incoming_can_match;
use crate::matching::executor::FillExecutor;

/// Engine-level error, wrapping the failure domains of each collaborator
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Book(#[from] BookError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("custody failure: {0}")]
    Custody(#[from] VaultError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("caller is not the pair's fee recipient")]
    NotFeeRecipient,
}

/// Outcome of an order submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    pub order_id: OrderId,
    pub fills: Vec<Fill>,
    /// Unfilled remainder; zero when the taker was fully filled
    pub remaining: Quantity,
    /// Whether the remainder was placed in the book
    pub rested: bool,
}

/// One side of a depth snapshot
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub order_count: usize,
}

/// Aggregated book depth, best levels first on both sides
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthSnapshot {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

/// A fill decided during the read-only planning walk
#[derive(Debug, Clone, Copy)]
struct PlannedFill {
    maker_order_id: OrderId,
    maker_account_id: AccountId,
    price: Price,
    quantity: Quantity,
}

/// Price-time priority matching engine for a single pair.
#[derive(Debug)]
pub struct MatchingEngine {
    pair_id: PairId,
    orders: HashMap<OrderId, Order>,
    bids: BidBook,
    asks: AskBook,
    ledger: BalanceLedger,
    executor: FillExecutor,
    order_sequence: u64,
    events: Vec<EngineEvent>,
}

impl MatchingEngine {
    /// Create an empty engine for a pair.
    pub fn new(pair_id: PairId) -> Self {
        Self {
            pair_id,
            orders: HashMap::new(),
            bids: BidBook::new(),
            asks: AskBook::new(),
            ledger: BalanceLedger::new(),
            executor: FillExecutor::new(0),
            order_sequence: 0,
            events: Vec::new(),
        }
    }

    pub fn pair_id(&self) -> PairId {
        self.pair_id
    }

    // ───────────────────────── Submission ─────────────────────────

    /// Submit a limit order: match against the opposite side, rest any
    /// remainder.
    ///
    /// `now` is the caller's logical clock; an order already expired at
    /// insertion is rejected outright. Validation, fill planning, and the
    /// custody pull all run before the first mutation, so any failure
    /// leaves prior state untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_order(
        &mut self,
        vault: &mut Vault,
        registry: &PairRegistry,
        account_id: AccountId,
        side: Side,
        price: Price,
        quantity: Quantity,
        expires_at: Option<i64>,
        now: i64,
    ) -> Result<SubmitResult, EngineError> {
        let pair = registry.get(&self.pair_id)?;

        // Phase 1: validation
        if price.is_zero() {
            return Err(OrderError::InvalidPrice.into());
        }
        if quantity.is_zero() {
            return Err(OrderError::InvalidQuantity.into());
        }
        let order = Order::new(
            account_id,
            self.pair_id,
            side,
            price,
            quantity,
            self.order_sequence,
            expires_at,
            now,
        );
        if order.is_expired(now) {
            return Err(OrderError::Expired {
                expires_at: expires_at.unwrap_or(now),
                now,
            }
            .into());
        }

        // Phase 2: read-only fill planning
        let planned = self.plan_fills(&order)?;

        // Phase 3: custody pull for the full order cost
        let escrow_asset = side.escrow_asset();
        let cost = match side {
            Side::Buy => quantity.value_at(price),
            Side::Sell => quantity.as_decimal(),
        };
        vault.pull_into_custody(&account_id, pair.asset_symbol(escrow_asset), cost)?;

        // Phase 4: commit fills in plan order
        let mut fills = Vec::with_capacity(planned.len());
        let mut remaining = quantity;
        for plan in planned {
            let fill = self.commit_fill(&order, &plan, pair, now)?;
            remaining = remaining
                .checked_sub(plan.quantity)
                .ok_or(OrderError::FillExceedsAvailable {
                    fill: plan.quantity.as_decimal(),
                    available: remaining.as_decimal(),
                })?;
            fills.push(fill);
        }

        // Phase 5: rest the remainder
        let rested = !remaining.is_zero();
        if rested {
            let locked = match side {
                Side::Buy => remaining.value_at(price),
                Side::Sell => remaining.as_decimal(),
            };
            self.ledger
                .escrow(order.order_id, account_id, side, locked)?;

            let mut resting = order.clone();
            resting.available_quantity = remaining;
            match side {
                Side::Buy => self.bids.insert(price, resting.order_id)?,
                Side::Sell => self.asks.insert(price, resting.order_id)?,
            }
            self.orders.insert(resting.order_id, resting);

            debug!(order_id = %order.order_id, %price, %remaining, "order rested");
            self.events.push(EngineEvent::OrderRested(OrderRested {
                order_id: order.order_id,
                account_id,
                pair_id: self.pair_id,
                side,
                price,
                remaining_quantity: remaining,
            }));
        }

        self.order_sequence += 1;
        info!(
            order_id = %order.order_id,
            fills = fills.len(),
            %remaining,
            rested,
            "order submitted"
        );
        Ok(SubmitResult {
            order_id: order.order_id,
            fills,
            remaining,
            rested,
        })
    }

    /// Walk the opposite side best-first, FIFO per level, and record the
    /// fills this order would take. Mutates nothing.
    fn plan_fills(&self, taker: &Order) -> Result<Vec<PlannedFill>, EngineError> {
        let mut planned = Vec::new();
        let mut remaining = taker.quantity;

        let mut walk_level = |price: Price, queue: &OrderQueue| -> Result<bool, EngineError> {
            if !incoming_can_match(taker.side, taker.price, price) {
                return Ok(false);
            }
            for maker_id in queue.iter() {
                if remaining.is_zero() {
                    return Ok(false);
                }
                let maker = self
                    .orders
                    .get(&maker_id)
                    .ok_or(OrderError::NotFound { order_id: maker_id })?;
                if maker.account_id == taker.account_id {
                    return Err(OrderError::SelfTrade.into());
                }
                let fill_quantity = remaining.min(maker.available_quantity);
                planned.push(PlannedFill {
                    maker_order_id: maker_id,
                    maker_account_id: maker.account_id,
                    price,
                    quantity: fill_quantity,
                });
                remaining = remaining.checked_sub(fill_quantity).ok_or(
                    OrderError::FillExceedsAvailable {
                        fill: fill_quantity.as_decimal(),
                        available: remaining.as_decimal(),
                    },
                )?;
            }
            Ok(!remaining.is_zero())
        };

        match taker.side {
            Side::Buy => {
                for (price, queue) in self.asks.iter_best_first() {
                    if !walk_level(price, queue)? {
                        break;
                    }
                }
            }
            Side::Sell => {
                for (price, queue) in self.bids.iter_best_first() {
                    if !walk_level(price, queue)? {
                        break;
                    }
                }
            }
        }
        Ok(planned)
    }

    /// Apply one planned fill: build the record, settle through the
    /// ledger, decrement the maker, and clean up a fully filled maker.
    fn commit_fill(
        &mut self,
        taker: &Order,
        plan: &PlannedFill,
        pair: &PairSpec,
        now: i64,
    ) -> Result<Fill, EngineError> {
        let fill = self.executor.execute_fill(
            self.pair_id,
            plan.maker_order_id,
            taker.order_id,
            plan.maker_account_id,
            taker.account_id,
            taker.side,
            plan.price,
            plan.quantity,
            &pair.fee,
            now,
        )?;

        let (buyer, seller, maker_side, buyer_surplus) = match taker.side {
            // Buy taker: execution at the maker's ask, limit difference
            // refunds to the buyer
            Side::Buy => (
                taker.account_id,
                plan.maker_account_id,
                Side::Sell,
                plan.quantity
                    .value_at(taker.price)
                    .checked_sub(plan.quantity.value_at(plan.price))
                    .ok_or(LedgerError::Overflow)?,
            ),
            // Sell taker: the maker buy's escrow covers the quote leg
            // exactly, so no surplus arises
            Side::Sell => (
                plan.maker_account_id,
                taker.account_id,
                Side::Buy,
                Decimal::ZERO,
            ),
        };

        self.ledger.settle_fill(
            plan.maker_order_id,
            maker_side,
            buyer,
            seller,
            plan.quantity,
            plan.price,
            fill.fee,
            buyer_surplus,
        )?;

        let maker = self
            .orders
            .get_mut(&plan.maker_order_id)
            .ok_or(OrderError::NotFound {
                order_id: plan.maker_order_id,
            })?;
        maker.fill(plan.quantity)?;
        if maker.is_filled() {
            match maker_side {
                Side::Buy => self.bids.remove(plan.price, plan.maker_order_id)?,
                Side::Sell => self.asks.remove(plan.price, plan.maker_order_id)?,
            }
            self.orders.remove(&plan.maker_order_id);
        }

        debug!(
            fill_id = %fill.fill_id,
            maker = %plan.maker_order_id,
            taker = %taker.order_id,
            price = %plan.price,
            quantity = %plan.quantity,
            "fill executed"
        );
        self.events
            .push(EngineEvent::FillExecuted(FillExecuted { fill: fill.clone() }));
        Ok(fill)
    }

    // ───────────────────────── Cancellation ─────────────────────────

    /// Cancel a resting order, refunding its remaining escrowed value to
    /// the owner's internal balance.
    ///
    /// The refund is computed from the order's current
    /// `available_quantity`, never its original quantity. Cancellation is
    /// always total.
    pub fn cancel_order(
        &mut self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<Decimal, EngineError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(OrderError::NotFound { order_id })?;
        if order.account_id != account_id {
            return Err(OrderError::NotOwner { order_id }.into());
        }
        let side = order.side;
        let price = order.price;
        let expected = order.escrowed_value();

        let refunded = self
            .ledger
            .refund_on_cancel(order_id, account_id, side, expected)?;
        match side {
            Side::Buy => self.bids.remove(price, order_id)?,
            Side::Sell => self.asks.remove(price, order_id)?,
        }
        self.orders.remove(&order_id);

        info!(%order_id, %refunded, "order canceled");
        self.events.push(EngineEvent::OrderCanceled(OrderCanceled {
            order_id,
            account_id,
            side,
            refunded,
        }));
        Ok(refunded)
    }

    // ───────────────────────── Withdrawal ─────────────────────────

    /// Withdraw a trader's full internal balance on one asset leg back to
    /// the vault.
    pub fn withdraw(
        &mut self,
        vault: &mut Vault,
        registry: &PairRegistry,
        account_id: AccountId,
        asset: Asset,
    ) -> Result<Decimal, EngineError> {
        let pair = registry.get(&self.pair_id)?;
        let amount = self.ledger.withdrawable(&account_id, asset);
        if amount.is_zero() {
            return Err(LedgerError::NothingToWithdraw.into());
        }

        // Push first: the ledger debit below cannot fail once the amount
        // is known non-zero, so a custody failure aborts cleanly
        vault.push_from_custody(account_id, pair.asset_symbol(asset), amount)?;
        self.ledger.take_withdrawal(account_id, asset)?;

        info!(%account_id, ?asset, %amount, "withdrawal completed");
        self.events
            .push(EngineEvent::WithdrawalCompleted(WithdrawalCompleted {
                account_id,
                asset,
                amount,
            }));
        Ok(amount)
    }

    /// Withdraw all accrued fees to the pair's fee recipient.
    ///
    /// Restricted to the recipient recorded in the registry.
    pub fn withdraw_fees(
        &mut self,
        vault: &mut Vault,
        registry: &PairRegistry,
        caller: AccountId,
    ) -> Result<(Decimal, Decimal), EngineError> {
        let pair = registry.get(&self.pair_id)?;
        if caller != pair.fee.recipient {
            return Err(EngineError::NotFeeRecipient);
        }

        let accrued = self.ledger.fees();
        if accrued.base.is_zero() && accrued.quote.is_zero() {
            return Err(LedgerError::NothingToWithdraw.into());
        }

        // Both legs must be pushable before either custody total or the
        // accrual moves
        for (asset, amount) in [(Asset::Base, accrued.base), (Asset::Quote, accrued.quote)] {
            let symbol = pair.asset_symbol(asset);
            let in_custody = vault.custody_total(symbol);
            if !amount.is_zero() && in_custody < amount {
                return Err(VaultError::CustodyShortfall {
                    asset: symbol.to_string(),
                    required: amount.to_string(),
                    in_custody: in_custody.to_string(),
                }
                .into());
            }
        }

        let (base_amount, quote_amount) = self.ledger.take_fees()?;
        if !base_amount.is_zero() {
            vault.push_from_custody(caller, pair.asset_symbol(Asset::Base), base_amount)?;
        }
        if !quote_amount.is_zero() {
            vault.push_from_custody(caller, pair.asset_symbol(Asset::Quote), quote_amount)?;
        }

        info!(recipient = %caller, %base_amount, %quote_amount, "fees withdrawn");
        self.events.push(EngineEvent::FeesWithdrawn(FeesWithdrawn {
            recipient: caller,
            base_amount,
            quote_amount,
        }));
        Ok((base_amount, quote_amount))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Look up a resting order.
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// The per-pair balance ledger.
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Best bid and ask prices.
    pub fn best_prices(&self) -> (Option<Price>, Option<Price>) {
        (self.bids.best_price(), self.asks.best_price())
    }

    /// Aggregated depth snapshot, up to `max_levels` per side, best first.
    pub fn depth(&self, max_levels: usize) -> DepthSnapshot {
        let aggregate = |price: Price, queue: &OrderQueue| -> DepthLevel {
            let mut quantity = Quantity::zero();
            let mut order_count = 0;
            for order_id in queue.iter() {
                if let Some(order) = self.orders.get(&order_id) {
                    quantity = quantity + order.available_quantity;
                    order_count += 1;
                }
            }
            DepthLevel {
                price,
                quantity,
                order_count,
            }
        };

        DepthSnapshot {
            bids: self
                .bids
                .iter_best_first()
                .take(max_levels)
                .map(|(price, queue)| aggregate(price, queue))
                .collect(),
            asks: self
                .asks
                .iter_best_first()
                .take(max_levels)
                .map(|(price, queue)| aggregate(price, queue))
                .collect(),
        }
    }

    /// Verify the conservation identity against the vault's custody
    /// totals on both asset legs.
    ///
    /// Meaningful when this pair is the only user of its asset symbols in
    /// the vault.
    pub fn check_conservation(
        &self,
        vault: &Vault,
        registry: &PairRegistry,
    ) -> Result<(), EngineError> {
        let pair = registry.get(&self.pair_id)?;
        let (locked_base, locked_quote) = self.ledger.locked_totals();
        let (balance_base, balance_quote) = self.ledger.balance_totals();
        let fees = self.ledger.fees();

        let expected_base = locked_base + balance_base + fees.base;
        let expected_quote = locked_quote + balance_quote + fees.quote;
        let custody_base = vault.custody_total(pair.asset_symbol(Asset::Base));
        let custody_quote = vault.custody_total(pair.asset_symbol(Asset::Quote));

        if custody_base != expected_base || custody_quote != expected_quote {
            return Err(LedgerError::ImbalanceDetected {
                detail: format!(
                    "custody ({custody_base} base, {custody_quote} quote) != \
                     ledger ({expected_base} base, {expected_quote} quote)"
                ),
            }
            .into());
        }
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    /// Emitted events since the last drain.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Drain and return all emitted events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}
