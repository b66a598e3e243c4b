//! Order book infrastructure module
//!
//! Contains the per-level FIFO order queue and the bid/ask price-level
//! indexes.

pub mod ask_book;
pub mod bid_book;
pub mod order_queue;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use order_queue::OrderQueue;
