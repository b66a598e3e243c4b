//! Bid (buy-side) price-level index
//!
//! Maintains buy levels keyed by price; the best bid is the *maximum*
//! price. Uses BTreeMap for deterministic iteration and O(log n)
//! insert/remove/min/max over distinct active prices.

use std::collections::BTreeMap;
use types::errors::BookError;
use types::ids::OrderId;
use types::numeric::Price;

use super::order_queue::OrderQueue;

/// Bid (buy) side price-level index
///
/// A level exists in the index iff its queue is non-empty.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    /// Price levels; BTreeMap iteration is ascending, so the best bid is
    /// the last key
    levels: BTreeMap<Price, OrderQueue>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order id at the tail of its price level, creating the
    /// level if absent
    pub fn insert(&mut self, price: Price, order_id: OrderId) -> Result<(), BookError> {
        let level = self.levels.entry(price).or_default();
        if let Err(err) = level.push(order_id) {
            // Do not leave an empty level behind for a rejected push
            if level.is_empty() {
                self.levels.remove(&price);
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Remove an order id from its price level, dropping the level when it
    /// empties
    ///
    /// Removing from an absent level or removing an unlinked id is a book
    /// invariant violation.
    pub fn remove(&mut self, price: Price, order_id: OrderId) -> Result<(), BookError> {
        let level = self
            .levels
            .get_mut(&price)
            .ok_or(BookError::PriceNotFound { price })?;
        level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Ok(())
    }

    /// Get the best bid price (maximum), `None` when empty
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Check if a price level is active
    pub fn contains_price(&self, price: Price) -> bool {
        self.levels.contains_key(&price)
    }

    /// Get the queue at a price level
    pub fn level(&self, price: Price) -> Option<&OrderQueue> {
        self.levels.get(&price)
    }

    /// Iterate levels best-first (highest price first)
    pub fn iter_best_first(&self) -> impl Iterator<Item = (Price, &OrderQueue)> {
        self.levels.iter().rev().map(|(price, queue)| (*price, queue))
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of active price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
