//! Custody and registry events
//!
//! Immutable records emitted for external indexing. Side effects only,
//! never control flow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{AccountId, PairId};

/// External funds arrived in a trader's vault balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceived {
    pub account_id: AccountId,
    pub asset: String,
    pub amount: Decimal,
}

/// Tokens moved from a trader's vault balance into engine custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyPulled {
    pub account_id: AccountId,
    pub asset: String,
    pub amount: Decimal,
}

/// Tokens moved from engine custody back to a trader's vault balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyPushed {
    pub account_id: AccountId,
    pub asset: String,
    pub amount: Decimal,
}

/// A new pair was registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCreated {
    pub pair_id: PairId,
    pub base_asset: String,
    pub quote_asset: String,
    pub fee_bps: u32,
    pub fee_recipient: AccountId,
}

/// The admin changed a pair's fee rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRateChanged {
    pub pair_id: PairId,
    pub old_fee_bps: u32,
    pub new_fee_bps: u32,
}

/// The admin changed a pair's fee recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecipientChanged {
    pub pair_id: PairId,
    pub old_recipient: AccountId,
    pub new_recipient: AccountId,
}

/// Enum wrapper for all custody events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyEvent {
    DepositReceived(DepositReceived),
    CustodyPulled(CustodyPulled),
    CustodyPushed(CustodyPushed),
    PairCreated(PairCreated),
    FeeRateChanged(FeeRateChanged),
    FeeRecipientChanged(FeeRecipientChanged),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_event_serialization() {
        let event = CustodyEvent::DepositReceived(DepositReceived {
            account_id: AccountId::new(),
            asset: "USDT".to_string(),
            amount: Decimal::from(10_000),
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: CustodyEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_pair_created_serialization() {
        let event = PairCreated {
            pair_id: PairId::new(),
            base_asset: "BTC".to_string(),
            quote_asset: "USDT".to_string(),
            fee_bps: 30,
            fee_recipient: AccountId::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: PairCreated = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }
}
