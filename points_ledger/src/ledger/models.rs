//! Ledger data models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Point quantity type
pub type Points = i64;

/// Payer name -> points. Ordered so responses are deterministic.
pub type PayerBalances = BTreeMap<String, Points>;

/// An unspent (or partially spent) quantity of points earned from one payer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lot {
    pub payer: String,
    pub points: Points,
    pub earned_at: DateTime<Utc>,
}

/// Consistent point-in-time view of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub user_id: String,
    pub total: Points,
    pub balances: PayerBalances,
    pub outstanding_lots: usize,
}

