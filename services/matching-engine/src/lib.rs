//! Matching Engine
//!
//! Order matching with strict price-time priority over an escrowed balance
//! ledger. Each submission, cancellation, or withdrawal runs to completion
//! against explicitly passed custody collaborators; all fallible steps
//! precede the first state mutation, so a failed call leaves no partial
//! fills or balance deltas behind.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced (FIFO within a price level)
//! - Execution at the resting order's price; taker price improvement is
//!   credited back, never stranded in custody
//! - Per pair: custody pulled − custody pushed = order-locked value +
//!   trader internal balances + accrued fees

pub mod book;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod matching;

pub use engine::{DepthSnapshot, EngineError, MatchingEngine, SubmitResult};
pub use events::EngineEvent;
pub use ledger::BalanceLedger;
