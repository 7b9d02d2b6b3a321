//! Storage layer for the ledger analyzer. Provides:
//! - The ordered, append-only record store ([`TransactionStore`])
//! - First-seen-ordered counting used for grouping ([`Tally`])
//!
//! Current implementation scans the records on every query; no results are
//! cached between calls.

mod tally;
mod transactions;

pub use tally::Tally;
pub use transactions::{DominantType, TransactionStore};
