//! Custody-specific error types

use thiserror::Error;

/// Vault errors
///
/// Any of these surfacing from a pull or push aborts the enclosing engine
/// call with no partial escrow or fill committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: String,
        available: String,
    },

    #[error("account not found: {account_id}")]
    AccountNotFound { account_id: String },

    #[error("transfer amount must be positive")]
    InvalidAmount,

    #[error("custody holds less {asset} than the requested push: required {required}, in custody {in_custody}")]
    CustodyShortfall {
        asset: String,
        required: String,
        in_custody: String,
    },

    #[error("arithmetic overflow in balance calculation")]
    Overflow,
}

/// Pair registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unauthorized: caller is not admin")]
    Unauthorized,

    #[error("pair not found: {pair_id}")]
    PairNotFound { pair_id: String },

    #[error("fee rate {fee_bps} exceeds denominator")]
    InvalidFeeRate { fee_bps: u32 },

    #[error("base and quote asset must differ: {asset}")]
    IdenticalAssets { asset: String },
}
