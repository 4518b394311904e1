//! Single-user account state: the payer balance map and the lot pool.
//!
//! Both structures hold the same point mass. The balance map answers "how
//! much from each payer", the pool answers "which points go first". Every
//! mutation here updates both or neither.

use chrono::{DateTime, Utc};

use super::{
    errors::{LedgerError, LedgerResult},
    models::{AccountSummary, Lot, PayerBalances, Points},
    pool::{LotPool, QueuedLot},
};

#[derive(Debug)]
pub(crate) struct Account {
    user_id: String,
    balances: PayerBalances,
    pool: LotPool,
}

impl Account {
    pub(crate) fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            balances: PayerBalances::new(),
            pool: LotPool::new(),
        }
    }

    /// Record points earned from a payer
    pub(crate) fn earn(
        &mut self,
        payer: &str,
        points: Points,
        earned_at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if points <= 0 {
            return Err(LedgerError::InvalidAmount(points));
        }

        // Keeping the account total representable keeps every payer balance representable too
        self.total_points()
            .checked_add(points)
            .ok_or(LedgerError::BalanceOverflow)?;

        let balance = self.balances.entry(payer.to_string()).or_insert(0);
        *balance += points;
        self.pool.push_new(payer.to_string(), points, earned_at);

        Ok(())
    }

    /// Spend points oldest-first across all payers
    ///
    /// Returns the points taken from each payer touched by this call, as
    /// negative numbers.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - `amount` is not positive
    /// * `LedgerError::InsufficientBalance` - `amount` exceeds the total balance
    /// * `LedgerError::Internal` - balance map and pool disagree; nothing is applied
    pub(crate) fn spend(&mut self, amount: Points) -> LedgerResult<PayerBalances> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let available = self.total_points();
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        // Plan: draw lots off the pool until the amount is covered
        let mut remaining = amount;
        let mut drawn: Vec<(QueuedLot, Points)> = Vec::new();
        let mut debits = PayerBalances::new();

        while remaining > 0 {
            let Some(lot) = self.pool.pop_oldest() else {
                self.put_back(drawn);
                return Err(LedgerError::Internal(format!(
                    "pool for {} exhausted with {} points left to spend",
                    self.user_id, remaining
                )));
            };

            let take = remaining.min(lot.points);
            remaining -= take;
            *debits.entry(lot.payer.clone()).or_insert(0) += take;
            drawn.push((lot, take));
        }

        if let Some((payer, take)) = debits
            .iter()
            .find(|(payer, take)| self.balances.get(*payer).copied().unwrap_or(0) < **take)
        {
            let message = format!(
                "payer {} balance for {} cannot cover {} points",
                payer, self.user_id, take
            );
            self.put_back(drawn);
            return Err(LedgerError::Internal(message));
        }

        // Commit: balances first, then any partially consumed lot goes back in place
        for (payer, take) in debits.iter_mut() {
            if let Some(balance) = self.balances.get_mut(payer) {
                *balance -= *take;
            }
            *take = -*take;
        }

        for (mut lot, take) in drawn {
            if lot.points > take {
                lot.points -= take;
                self.pool.restore(lot);
            }
        }

        Ok(debits)
    }

    fn put_back(&mut self, drawn: Vec<(QueuedLot, Points)>) {
        for (lot, _) in drawn {
            self.pool.restore(lot);
        }
    }

    pub(crate) fn balances(&self) -> PayerBalances {
        self.balances.clone()
    }

    pub(crate) fn total_points(&self) -> Points {
        self.balances.values().sum()
    }

    pub(crate) fn outstanding_lots(&self) -> Vec<Lot> {
        self.pool.sorted_lots()
    }

    pub(crate) fn summary(&self) -> AccountSummary {
        AccountSummary {
            user_id: self.user_id.clone(),
            total: self.total_points(),
            balances: self.balances(),
            outstanding_lots: self.pool.len(),
        }
    }

    /// Check that the balance map and the pool agree
    pub(crate) fn verify(&self) -> LedgerResult<()> {
        if let Some((payer, balance)) = self.balances.iter().find(|(_, balance)| **balance < 0) {
            return Err(LedgerError::Internal(format!(
                "payer {} has negative balance {} for {}",
                payer, balance, self.user_id
            )));
        }

        let pool_total = self.pool.total_points().ok_or_else(|| {
            LedgerError::Internal(format!("pool total for {} overflows", self.user_id))
        })?;
        let balance_total = self.total_points();

        if pool_total != balance_total {
            return Err(LedgerError::Internal(format!(
                "pool for {} holds {} points but balances sum to {}",
                self.user_id, pool_total, balance_total
            )));
        }

        Ok(())
    }
}
