//! Repository trait over ledger operations.
//!
//! Transport layers depend on `dyn PointsRepository` rather than on a
//! concrete ledger, so handlers can be exercised against any implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    errors::LedgerResult,
    manager::LedgerManager,
    models::{AccountSummary, PayerBalances, Points},
};

/// Trait for points ledger operations
#[async_trait]
pub trait PointsRepository: Send + Sync {
    /// Register a new user
    async fn create_account(&self, user_id: &str) -> LedgerResult<()>;

    /// Record points earned from a payer
    async fn record_earn(
        &self,
        user_id: &str,
        payer: &str,
        points: Points,
        earned_at: DateTime<Utc>,
    ) -> LedgerResult<()>;

    /// Spend points oldest first, returning the negative debit per payer
    async fn spend(&self, user_id: &str, amount: Points) -> LedgerResult<PayerBalances>;

    /// Current balance per payer
    async fn payer_balances(&self, user_id: &str) -> LedgerResult<PayerBalances>;

    /// Total balance across payers
    async fn total_points(&self, user_id: &str) -> LedgerResult<Points>;

    /// Total and per-payer balances from one snapshot
    async fn account_summary(&self, user_id: &str) -> LedgerResult<AccountSummary>;

    /// Number of registered accounts
    async fn account_count(&self) -> usize;
}

#[async_trait]
impl PointsRepository for LedgerManager {
    async fn create_account(&self, user_id: &str) -> LedgerResult<()> {
        LedgerManager::create_account(self, user_id).await
    }

    async fn record_earn(
        &self,
        user_id: &str,
        payer: &str,
        points: Points,
        earned_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        LedgerManager::record_earn(self, user_id, payer, points, earned_at).await
    }

    async fn spend(&self, user_id: &str, amount: Points) -> LedgerResult<PayerBalances> {
        LedgerManager::spend(self, user_id, amount).await
    }

    async fn payer_balances(&self, user_id: &str) -> LedgerResult<PayerBalances> {
        LedgerManager::payer_balances(self, user_id).await
    }

    async fn total_points(&self, user_id: &str) -> LedgerResult<Points> {
        LedgerManager::total_points(self, user_id).await
    }

    async fn account_summary(&self, user_id: &str) -> LedgerResult<AccountSummary> {
        LedgerManager::account_summary(self, user_id).await
    }

    async fn account_count(&self) -> usize {
        LedgerManager::account_count(self).await
    }
}
