//! Pair registry — creation and fee-parameter administration
//!
//! Pairs are created once by the administrator and never deleted, so
//! resting orders can always be cancelled. The fee rate and recipient stay
//! mutable by the administrator. The matching core only consumes
//! [`PairRegistry::get`] and [`PairRegistry::is_valid`].

use std::collections::HashMap;
use tracing::info;
use types::fee::{FeeSchedule, FEE_DENOMINATOR};
use types::ids::{AccountId, PairId};

use crate::errors::RegistryError;
use crate::events::{CustodyEvent, FeeRateChanged, FeeRecipientChanged, PairCreated};
use crate::security::AccessControl;

/// A registered asset pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    pub pair_id: PairId,
    /// Asset symbol of the base leg (the thing being traded)
    pub base_asset: String,
    /// Asset symbol of the quote leg (the thing it is priced in)
    pub quote_asset: String,
    pub fee: FeeSchedule,
}

impl PairSpec {
    /// Resolve an asset leg to its symbol.
    pub fn asset_symbol(&self, asset: types::order::Asset) -> &str {
        match asset {
            types::order::Asset::Base => &self.base_asset,
            types::order::Asset::Quote => &self.quote_asset,
        }
    }
}

/// Registry of tradable pairs, admin-gated.
#[derive(Debug)]
pub struct PairRegistry {
    pairs: HashMap<PairId, PairSpec>,
    access_control: AccessControl,
    /// Emitted events log (append-only)
    events: Vec<CustodyEvent>,
}

impl PairRegistry {
    /// Create a registry with an initial admin caller.
    pub fn new(admin: impl Into<String>) -> Self {
        Self {
            pairs: HashMap::new(),
            access_control: AccessControl::new(admin),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Pair creation ─────────────────────────

    /// Register a new pair. Admin-only.
    ///
    /// Returns the issued [`PairId`]. Emits `PairCreated`.
    pub fn create_pair(
        &mut self,
        caller: &str,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
        fee_bps: u32,
        fee_recipient: AccountId,
    ) -> Result<PairId, RegistryError> {
        if !self.access_control.is_admin(caller) {
            return Err(RegistryError::Unauthorized);
        }
        if fee_bps > FEE_DENOMINATOR {
            return Err(RegistryError::InvalidFeeRate { fee_bps });
        }

        let base_asset = base_asset.into();
        let quote_asset = quote_asset.into();
        if base_asset == quote_asset {
            return Err(RegistryError::IdenticalAssets { asset: base_asset });
        }

        let pair_id = PairId::new();
        let spec = PairSpec {
            pair_id,
            base_asset: base_asset.clone(),
            quote_asset: quote_asset.clone(),
            fee: FeeSchedule::new(fee_bps, fee_recipient),
        };
        self.pairs.insert(pair_id, spec);

        info!(%pair_id, %base_asset, %quote_asset, fee_bps, "pair created");
        self.events.push(CustodyEvent::PairCreated(PairCreated {
            pair_id,
            base_asset,
            quote_asset,
            fee_bps,
            fee_recipient,
        }));
        Ok(pair_id)
    }

    // ───────────────────────── Fee administration ─────────────────────────

    /// Change a pair's fee rate. Admin-only. Emits `FeeRateChanged`.
    pub fn set_fee_bps(
        &mut self,
        caller: &str,
        pair_id: PairId,
        fee_bps: u32,
    ) -> Result<(), RegistryError> {
        if !self.access_control.is_admin(caller) {
            return Err(RegistryError::Unauthorized);
        }
        if fee_bps > FEE_DENOMINATOR {
            return Err(RegistryError::InvalidFeeRate { fee_bps });
        }

        let spec = self
            .pairs
            .get_mut(&pair_id)
            .ok_or_else(|| RegistryError::PairNotFound {
                pair_id: pair_id.to_string(),
            })?;

        let old_fee_bps = spec.fee.fee_bps;
        spec.fee.fee_bps = fee_bps;

        info!(%pair_id, old_fee_bps, fee_bps, "fee rate changed");
        self.events.push(CustodyEvent::FeeRateChanged(FeeRateChanged {
            pair_id,
            old_fee_bps,
            new_fee_bps: fee_bps,
        }));
        Ok(())
    }

    /// Change a pair's fee recipient. Admin-only. Emits `FeeRecipientChanged`.
    pub fn set_fee_recipient(
        &mut self,
        caller: &str,
        pair_id: PairId,
        recipient: AccountId,
    ) -> Result<(), RegistryError> {
        if !self.access_control.is_admin(caller) {
            return Err(RegistryError::Unauthorized);
        }

        let spec = self
            .pairs
            .get_mut(&pair_id)
            .ok_or_else(|| RegistryError::PairNotFound {
                pair_id: pair_id.to_string(),
            })?;

        let old_recipient = spec.fee.recipient;
        spec.fee.recipient = recipient;

        info!(%pair_id, %old_recipient, %recipient, "fee recipient changed");
        self.events
            .push(CustodyEvent::FeeRecipientChanged(FeeRecipientChanged {
                pair_id,
                old_recipient,
                new_recipient: recipient,
            }));
        Ok(())
    }

    // ───────────────────────── Resolution ─────────────────────────

    /// Resolve a pair id to its spec.
    pub fn get(&self, pair_id: &PairId) -> Result<&PairSpec, RegistryError> {
        self.pairs
            .get(pair_id)
            .ok_or_else(|| RegistryError::PairNotFound {
                pair_id: pair_id.to_string(),
            })
    }

    /// Check whether a pair id is registered.
    pub fn is_valid(&self, pair_id: &PairId) -> bool {
        self.pairs.contains_key(pair_id)
    }

    /// Enumerate all registered pairs.
    pub fn pairs(&self) -> impl Iterator<Item = &PairSpec> {
        self.pairs.values()
    }

    /// Transfer the admin role.
    pub fn set_admin(&mut self, current_admin: &str, new_admin: &str) -> Result<(), RegistryError> {
        if !self.access_control.transfer_admin(current_admin, new_admin) {
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    /// Get the current admin.
    pub fn admin(&self) -> &str {
        self.access_control.admin()
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
