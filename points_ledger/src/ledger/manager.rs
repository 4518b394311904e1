//! Ledger manager: the account registry with per-account locking.

use super::{
    account::Account,
    errors::{LedgerError, LedgerResult},
    models::{AccountSummary, Lot, PayerBalances, Points},
};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

type AccountHandle = Arc<RwLock<Account>>;

/// Ledger manager
///
/// Holds one account per registered user. The registry lock is only taken
/// to look up or insert an account handle; each operation then runs under
/// that account's own lock, so requests for different users never wait on
/// each other.
#[derive(Clone, Default)]
pub struct LedgerManager {
    accounts: Arc<RwLock<HashMap<String, AccountHandle>>>,
}

impl LedgerManager {
    /// Create an empty ledger
    ///
    /// # Returns
    ///
    /// * `LedgerManager` - New ledger instance with no registered users
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user account
    ///
    /// # Arguments
    ///
    /// * `user_id` - User identifier
    ///
    /// # Errors
    ///
    /// * `LedgerError::AlreadyExists` - The user is already registered
    pub async fn create_account(&self, user_id: &str) -> LedgerResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(user_id) {
            warn!("Rejected duplicate account creation for {}", user_id);
            return Err(LedgerError::AlreadyExists(user_id.to_string()));
        }

        accounts.insert(
            user_id.to_string(),
            Arc::new(RwLock::new(Account::new(user_id))),
        );
        info!("Created account {}", user_id);

        Ok(())
    }

    /// Record an earn transaction
    ///
    /// # Arguments
    ///
    /// * `user_id` - User identifier
    /// * `payer` - Payer contributing the points
    /// * `points` - Number of points earned (must be positive)
    /// * `earned_at` - When the points were earned
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - The user is not registered
    /// * `LedgerError::InvalidAmount` - `points` is not positive
    /// * `LedgerError::BalanceOverflow` - The balance can not hold the new points
    pub async fn record_earn(
        &self,
        user_id: &str,
        payer: &str,
        points: Points,
        earned_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let handle = self.account(user_id).await?;
        let mut account = handle.write().await;

        account.earn(payer, points, earned_at)?;
        debug!(
            "Recorded {} points from {} for {} at {}",
            points, payer, user_id, earned_at
        );

        Ok(())
    }

    /// Spend points, oldest first
    ///
    /// # Arguments
    ///
    /// * `user_id` - User identifier
    /// * `amount` - Number of points to spend (must be positive)
    ///
    /// # Returns
    ///
    /// * `LedgerResult<PayerBalances>` - Points taken from each payer, as negative numbers
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - The user is not registered
    /// * `LedgerError::InvalidAmount` - `amount` is not positive
    /// * `LedgerError::InsufficientBalance` - Not enough points
    /// * `LedgerError::Internal` - Ledger state is inconsistent; nothing was applied
    pub async fn spend(&self, user_id: &str, amount: Points) -> LedgerResult<PayerBalances> {
        let handle = self.account(user_id).await?;
        let mut account = handle.write().await;

        match account.spend(amount) {
            Ok(spent) => {
                debug!("Spent {} points for {}: {:?}", amount, user_id, spent);
                Ok(spent)
            }
            Err(e @ LedgerError::Internal(_)) => {
                log::error!("Spend of {} for {} aborted: {}", amount, user_id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Get the current balance for each payer
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - The user is not registered
    pub async fn payer_balances(&self, user_id: &str) -> LedgerResult<PayerBalances> {
        let handle = self.account(user_id).await?;
        let account = handle.read().await;
        Ok(account.balances())
    }

    /// Get the total balance across all payers
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - The user is not registered
    pub async fn total_points(&self, user_id: &str) -> LedgerResult<Points> {
        let handle = self.account(user_id).await?;
        let account = handle.read().await;
        Ok(account.total_points())
    }

    /// Get total, per-payer balances and lot count from a single snapshot
    pub async fn account_summary(&self, user_id: &str) -> LedgerResult<AccountSummary> {
        let handle = self.account(user_id).await?;
        let account = handle.read().await;
        Ok(account.summary())
    }

    /// Get unspent lots in the order they would be spent
    pub async fn outstanding_lots(&self, user_id: &str) -> LedgerResult<Vec<Lot>> {
        let handle = self.account(user_id).await?;
        let account = handle.read().await;
        Ok(account.outstanding_lots())
    }

    /// Check that an account's balance map and lot pool agree
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - The user is not registered
    /// * `LedgerError::Internal` - The two structures disagree
    pub async fn verify_invariants(&self, user_id: &str) -> LedgerResult<()> {
        let handle = self.account(user_id).await?;
        let account = handle.read().await;
        account.verify()
    }

    /// Number of registered accounts
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    async fn account(&self, user_id: &str) -> LedgerResult<AccountHandle> {
        self.accounts
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 10, 31, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_account_twice_fails() {
        let ledger = LedgerManager::new();

        ledger.create_account("alice").await.unwrap();
        let err = ledger.create_account("alice").await.unwrap_err();

        assert_eq!(err, LedgerError::AlreadyExists("alice".to_string()));
        assert_eq!(ledger.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let ledger = LedgerManager::new();
        let missing = LedgerError::NotFound("ghost".to_string());

        assert_eq!(
            ledger.record_earn("ghost", "DANNON", 10, at(10)).await,
            Err(missing.clone())
        );
        assert_eq!(ledger.spend("ghost", 10).await, Err(missing.clone()));
        assert_eq!(ledger.payer_balances("ghost").await, Err(missing.clone()));
        assert_eq!(ledger.total_points("ghost").await, Err(missing.clone()));
        assert_eq!(ledger.verify_invariants("ghost").await, Err(missing));
    }

    #[tokio::test]
    async fn test_new_account_is_empty() {
        let ledger = LedgerManager::new();
        ledger.create_account("alice").await.unwrap();

        assert_eq!(ledger.total_points("alice").await, Ok(0));
        assert!(ledger.payer_balances("alice").await.unwrap().is_empty());
        assert!(ledger.outstanding_lots("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_does_not_alias_ledger_state() {
        let ledger = LedgerManager::new();
        ledger.create_account("alice").await.unwrap();
        ledger
            .record_earn("alice", "DANNON", 300, at(10))
            .await
            .unwrap();

        let mut snapshot = ledger.payer_balances("alice").await.unwrap();
        snapshot.insert("DANNON".to_string(), 1_000_000);

        assert_eq!(
            ledger.payer_balances("alice").await.unwrap().get("DANNON"),
            Some(&300)
        );
    }

    #[tokio::test]
    async fn test_accounts_are_independent() {
        let ledger = LedgerManager::new();
        ledger.create_account("alice").await.unwrap();
        ledger.create_account("bob").await.unwrap();
        ledger
            .record_earn("alice", "DANNON", 300, at(10))
            .await
            .unwrap();

        assert_eq!(ledger.total_points("bob").await, Ok(0));
        assert!(matches!(
            ledger.spend("bob", 1).await,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.total_points("alice").await, Ok(300));
    }

    #[tokio::test]
    async fn test_summary_matches_individual_queries() {
        let ledger = LedgerManager::new();
        ledger.create_account("alice").await.unwrap();
        ledger
            .record_earn("alice", "DANNON", 300, at(10))
            .await
            .unwrap();
        ledger
            .record_earn("alice", "UNILEVER", 200, at(11))
            .await
            .unwrap();

        let summary = ledger.account_summary("alice").await.unwrap();

        assert_eq!(summary.user_id, "alice");
        assert_eq!(summary.total, ledger.total_points("alice").await.unwrap());
        assert_eq!(
            summary.balances,
            ledger.payer_balances("alice").await.unwrap()
        );
        assert_eq!(summary.outstanding_lots, 2);
    }
}
