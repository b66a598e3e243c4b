//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// A buy matches a sell when the bid price is >= the ask price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order crosses a resting order's price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Buy => incoming_price >= resting_price,
        Side::Sell => incoming_price <= resting_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_crossing() {
        let bid = Price::from_u64(50_000);
        let ask = Price::from_u64(49_000);
        assert!(can_match(bid, ask), "Bid >= ask should match");
    }

    #[test]
    fn test_can_match_exact() {
        let price = Price::from_u64(50_000);
        assert!(can_match(price, price), "Equal prices should match");
    }

    #[test]
    fn test_can_match_no_cross() {
        let bid = Price::from_u64(49_000);
        let ask = Price::from_u64(50_000);
        assert!(!can_match(bid, ask), "Bid < ask should not match");
    }

    #[test]
    fn test_incoming_buy_can_match() {
        assert!(incoming_can_match(
            Side::Buy,
            Price::from_u64(50_000),
            Price::from_u64(49_000)
        ));
        assert!(!incoming_can_match(
            Side::Buy,
            Price::from_u64(48_000),
            Price::from_u64(49_000)
        ));
    }

    #[test]
    fn test_incoming_sell_can_match() {
        assert!(incoming_can_match(
            Side::Sell,
            Price::from_u64(49_000),
            Price::from_u64(50_000)
        ));
        assert!(!incoming_can_match(
            Side::Sell,
            Price::from_u64(51_000),
            Price::from_u64(50_000)
        ));
    }
}
