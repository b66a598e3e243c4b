//! Types library for the on-ledger order book
//!
//! Provides the core type definitions shared by the matching engine and the
//! custody layer: identifiers, fixed-point numerics, order lifecycle types,
//! fill records, the fee schedule, and the error taxonomy.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, FillId, AccountId, PairId)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Order lifecycle types
//! - `fill`: Fill execution records
//! - `fee`: Fee schedule types
//! - `errors`: Error taxonomy

pub mod errors;
pub mod fee;
pub mod fill;
pub mod ids;
pub mod numeric;
pub mod order;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::fee::*;
    pub use crate::fill::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
}
