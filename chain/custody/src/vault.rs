//! Vault — asset custody, deposits, and balance tracking
//!
//! Balances are stored as `HashMap<AccountId, HashMap<String, Decimal>>`
//! where the inner map keys are asset symbol strings (e.g. "BTC", "USDT").
//! Per-asset custody totals track everything pulled into the engine and not
//! yet pushed back, so the ledger conservation property is observable from
//! the outside:
//!
//! `custody_total(asset) == locked-in-orders + trader internal balances + fee accrual`
//!
//! The engine calls [`Vault::pull_into_custody`] before escrowing a new
//! order's cost, and [`Vault::push_from_custody`] exactly once per
//! withdrawal leg with the precomputed amount.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use types::ids::AccountId;

use crate::errors::VaultError;
use crate::events::{CustodyEvent, CustodyPulled, CustodyPushed, DepositReceived};

/// Custody vault for trader funds.
#[derive(Debug, Default)]
pub struct Vault {
    /// Free balances: account -> (asset -> amount)
    balances: HashMap<AccountId, HashMap<String, Decimal>>,
    /// Per-asset totals currently held in engine custody
    custody: HashMap<String, Decimal>,
    /// Emitted events log (append-only)
    events: Vec<CustodyEvent>,
}

impl Vault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Deposit external funds into an account's free balance.
    ///
    /// Emits `DepositReceived`. Amount must be positive.
    pub fn deposit(
        &mut self,
        account_id: AccountId,
        asset: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }

        self.credit_account(account_id, asset, amount)?;
        debug!(%account_id, asset, %amount, "deposit received");

        self.events.push(CustodyEvent::DepositReceived(DepositReceived {
            account_id,
            asset: asset.to_string(),
            amount,
        }));
        Ok(())
    }

    // ───────────────────────── Custody transfers ─────────────────────────

    /// Pull tokens from an account's free balance into engine custody.
    ///
    /// Fails with `InsufficientBalance` (or `AccountNotFound`) without any
    /// state change; never leaves a partial transfer.
    pub fn pull_into_custody(
        &mut self,
        account_id: &AccountId,
        asset: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }

        self.debit_account(account_id, asset, amount)?;

        let total = self.custody.entry(asset.to_string()).or_insert(Decimal::ZERO);
        *total = total.checked_add(amount).ok_or(VaultError::Overflow)?;

        debug!(account_id = %account_id, asset, %amount, "pulled into custody");
        self.events.push(CustodyEvent::CustodyPulled(CustodyPulled {
            account_id: *account_id,
            asset: asset.to_string(),
            amount,
        }));
        Ok(())
    }

    /// Push tokens from engine custody back to an account's free balance.
    ///
    /// A shortfall means the engine asked for more than it ever pulled,
    /// which is an invariant breach on the caller's side.
    pub fn push_from_custody(
        &mut self,
        account_id: AccountId,
        asset: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }

        let in_custody = self.custody.get(asset).copied().unwrap_or(Decimal::ZERO);
        if in_custody < amount {
            return Err(VaultError::CustodyShortfall {
                asset: asset.to_string(),
                required: amount.to_string(),
                in_custody: in_custody.to_string(),
            });
        }
        let total = self.custody.entry(asset.to_string()).or_insert(Decimal::ZERO);
        *total = total.checked_sub(amount).ok_or(VaultError::Overflow)?;

        self.credit_account(account_id, asset, amount)?;

        debug!(%account_id, asset, %amount, "pushed from custody");
        self.events.push(CustodyEvent::CustodyPushed(CustodyPushed {
            account_id,
            asset: asset.to_string(),
            amount,
        }));
        Ok(())
    }

    // ───────────────────────── Balance queries ─────────────────────────

    /// Free balance for a specific account and asset.
    pub fn balance_of(&self, account_id: &AccountId, asset: &str) -> Decimal {
        self.balances
            .get(account_id)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total amount of an asset currently held in engine custody.
    pub fn custody_total(&self, asset: &str) -> Decimal {
        self.custody.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    // ───────────────────────── Internal transfers ─────────────────────────

    /// Internal credit with overflow protection.
    fn credit_account(
        &mut self,
        account_id: AccountId,
        asset: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        let account_balances = self.balances.entry(account_id).or_default();
        let current = account_balances
            .entry(asset.to_string())
            .or_insert(Decimal::ZERO);

        *current = current.checked_add(amount).ok_or(VaultError::Overflow)?;
        Ok(())
    }

    /// Internal debit with underflow protection.
    fn debit_account(
        &mut self,
        account_id: &AccountId,
        asset: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        let account_balances =
            self.balances
                .get_mut(account_id)
                .ok_or_else(|| VaultError::AccountNotFound {
                    account_id: account_id.to_string(),
                })?;

        let current = account_balances.get_mut(asset).ok_or_else(|| {
            VaultError::InsufficientBalance {
                asset: asset.to_string(),
                required: amount.to_string(),
                available: "0".to_string(),
            }
        })?;

        if *current < amount {
            return Err(VaultError::InsufficientBalance {
                asset: asset.to_string(),
                required: amount.to_string(),
                available: current.to_string(),
            });
        }

        *current = current.checked_sub(amount).ok_or(VaultError::Overflow)?;
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[CustodyEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<CustodyEvent> {
        std::mem::take(&mut self.events)
    }
}
