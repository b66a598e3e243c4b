//! Custody layer for the on-ledger order book
//!
//! The matching core treats these as external collaborators:
//! - [`vault::Vault`] — asset custody: deposits, pulls into engine custody,
//!   pushes back to trader accounts;
//! - [`registry::PairRegistry`] — pair creation and fee-parameter mutation,
//!   restricted to an administrator;
//! - [`security::AccessControl`] — the administrator role itself.
//!
//! Asset transfers are assumed reliable, atomic, and already authorized;
//! no signature verification happens here.

pub mod errors;
pub mod events;
pub mod registry;
pub mod security;
pub mod vault;

pub use errors::{RegistryError, VaultError};
pub use events::CustodyEvent;
pub use registry::{PairRegistry, PairSpec};
pub use vault::Vault;
