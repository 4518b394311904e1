//! Ledger module tracking reward points per user and payer.
//!
//! This module implements:
//! - Account registry gating every operation
//! - Per-payer balance map for each user
//! - Chronological lot pool so the oldest points are always spent first
//! - Per-account locking so unrelated users never serialize on each other
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use points_ledger::ledger::LedgerManager;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = LedgerManager::new();
//! ledger.create_account("alice").await?;
//!
//! let morning = Utc.with_ymd_and_hms(2020, 10, 31, 10, 0, 0).unwrap();
//! let noon = Utc.with_ymd_and_hms(2020, 10, 31, 12, 0, 0).unwrap();
//! ledger.record_earn("alice", "UNILEVER", 200, noon).await?;
//! ledger.record_earn("alice", "DANNON", 300, morning).await?;
//!
//! // The DANNON points are older, so they go first
//! let spent = ledger.spend("alice", 350).await?;
//! assert_eq!(spent.get("DANNON"), Some(&-300));
//! assert_eq!(spent.get("UNILEVER"), Some(&-50));
//! # Ok(())
//! # }
//! ```

mod account;
pub mod errors;
pub mod manager;
pub mod models;
mod pool;
pub mod repository;

pub use errors::{LedgerError, LedgerResult};
pub use manager::LedgerManager;
pub use models::{AccountSummary, Lot, PayerBalances, Points};
pub use repository::PointsRepository;
