//! # Points Ledger
//!
//! An in-memory reward points ledger. Users earn points from many payers at
//! different times; when a user spends points, the oldest points are
//! consumed first regardless of which payer contributed them.
//!
//! ## Architecture
//!
//! Each account keeps two views of the same points:
//!
//! - **Balance map**: payer -> available points, for balance queries
//! - **Lot pool**: a min-heap of unspent lots keyed by earn time, which decides
//!   spend order
//!
//! A spend draws lots off the pool oldest-first, debits the matching payers,
//! and leaves any partially consumed lot in place at its original timestamp.
//!
//! ## Core Modules
//!
//! - [`ledger`]: Account registry, spend algorithm, error types and the
//!   [`PointsRepository`] trait transport layers depend on
//!
//! ## Example
//!
//! ```
//! use points_ledger::LedgerManager;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ledger = LedgerManager::new();
//! ledger.create_account("alice").await.unwrap();
//! assert_eq!(ledger.total_points("alice").await, Ok(0));
//! # }
//! ```

/// Ledger engine, models and errors.
pub mod ledger;
pub use ledger::{
    AccountSummary, LedgerError, LedgerManager, LedgerResult, Lot, PayerBalances, Points,
    PointsRepository,
};
