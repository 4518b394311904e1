//! Ledger error types.

use thiserror::Error;

use super::models::Points;

/// Ledger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Operation referenced a user that was never registered
    #[error("User {0} does not exist")]
    NotFound(String),

    /// Account creation for a user that is already registered
    #[error("User {0} already exists")]
    AlreadyExists(String),

    /// Spend amount exceeds the user's total balance
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Points, required: Points },

    /// Invalid amount (must be positive)
    #[error("Invalid amount: {0}")]
    InvalidAmount(Points),

    /// Crediting points would overflow the balance
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Internal consistency failure between the balance map and the lot pool
    #[error("Ledger invariant violated: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Get a client-safe error message that doesn't leak internal state
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Short stable label, used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::NotFound(_) => "not_found",
            LedgerError::AlreadyExists(_) => "already_exists",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InvalidAmount(_) => "invalid_amount",
            LedgerError::BalanceOverflow => "balance_overflow",
            LedgerError::Internal(_) => "internal",
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_is_sanitized() {
        let err = LedgerError::Internal("pool sum 10 != balance sum 12".to_string());
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.to_string().contains("pool sum 10"));
    }

    #[test]
    fn test_domain_errors_are_exposed() {
        let err = LedgerError::InsufficientBalance {
            available: 100,
            required: 5000,
        };
        assert_eq!(
            err.client_message(),
            "Insufficient balance: available 100, required 5000"
        );
        assert_eq!(
            LedgerError::NotFound("alice".to_string()).client_message(),
            "User alice does not exist"
        );
    }
}
