//! Ledger error types.
//!
//! Every validation failure is recoverable and carries a user-facing
//! message through `Display`. Store failures are split into retryable
//! conflicts and unavailability so the service can retry exactly once.

use payout_shared::{AppError, Money, WithdrawalId};
use thiserror::Error;

use crate::withdrawal::error::MethodError;
use crate::withdrawal::types::WithdrawalStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Input Errors ==========
    /// Structurally invalid argument (dates, earning amounts, config).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Amount is not a positive whole number of minor units.
    #[error("Amount must be a positive whole number")]
    InvalidAmount,

    /// Amount is under the payout floor.
    #[error("Minimum withdrawal amount is {minimum}, requested {amount}")]
    BelowMinimum {
        /// The requested amount.
        amount: Money,
        /// The configured minimum.
        minimum: Money,
    },

    /// Amount exceeds the currently available funds.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// The requested amount.
        requested: Money,
        /// The available balance at the time of the check.
        available: Money,
    },

    /// Fee requested for an unknown method.
    #[error("Invalid withdrawal method: {0}")]
    InvalidMethod(String),

    /// Withdrawal method payload failed validation.
    #[error(transparent)]
    Method(#[from] MethodError),

    // ========== State Errors ==========
    /// Withdrawal status transition not allowed.
    #[error("Invalid withdrawal status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: WithdrawalStatus,
        /// The attempted target status.
        to: WithdrawalStatus,
    },

    /// Withdrawal request not found.
    #[error("Withdrawal not found: {0}")]
    WithdrawalNotFound(WithdrawalId),

    /// A minor-unit total left the `i64` range.
    #[error("Amount overflow while aggregating earnings")]
    Overflow,

    // ========== Store Errors ==========
    /// Concurrent modification detected by the store.
    #[error("Concurrent modification detected, please retry: {0}")]
    Conflict(String),

    /// The backing store failed or could not be reached.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::BelowMinimum { .. } => "BELOW_MINIMUM",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InvalidMethod(_) => "INVALID_METHOD",
            Self::Method(e) => e.error_code(),
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::WithdrawalNotFound(_) => "WITHDRAWAL_NOT_FOUND",
            Self::Overflow => "AMOUNT_OVERFLOW",
            Self::Conflict(_) => "CONCURRENT_MODIFICATION",
            Self::LedgerUnavailable(_) => "LEDGER_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidInput(_)
            | Self::InvalidAmount
            | Self::BelowMinimum { .. }
            | Self::InvalidMethod(_)
            | Self::Method(_) => 400,

            // 404 Not Found
            Self::WithdrawalNotFound(_) => 404,

            // 409 Conflict - state and concurrency errors
            Self::InvalidTransition { .. } | Self::Conflict(_) => 409,

            // 422 Unprocessable - balance rules
            Self::InsufficientBalance { .. } | Self::Overflow => 422,

            // 503 Service Unavailable
            Self::LedgerUnavailable(_) => 503,
        }
    }

    /// Returns true if the store operation may succeed when retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::LedgerUnavailable(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::InvalidInput(_)
            | LedgerError::InvalidAmount
            | LedgerError::BelowMinimum { .. }
            | LedgerError::InvalidMethod(_)
            | LedgerError::Method(_) => Self::Validation(message),
            LedgerError::InsufficientBalance { .. } | LedgerError::Overflow => {
                Self::BusinessRule(message)
            }
            LedgerError::WithdrawalNotFound(_) => Self::NotFound(message),
            LedgerError::InvalidTransition { .. } | LedgerError::Conflict(_) => {
                Self::Conflict(message)
            }
            LedgerError::LedgerUnavailable(_) => Self::Unavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InvalidAmount.error_code(), "INVALID_AMOUNT");
        assert_eq!(
            LedgerError::BelowMinimum {
                amount: Money::new(999),
                minimum: Money::new(1000),
            }
            .error_code(),
            "BELOW_MINIMUM"
        );
        assert_eq!(
            LedgerError::Method(MethodError::BankNameRequired).error_code(),
            "BANK_NAME_REQUIRED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidAmount.http_status_code(), 400);
        assert_eq!(
            LedgerError::InsufficientBalance {
                requested: Money::new(10_001),
                available: Money::new(10_000),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::WithdrawalNotFound(WithdrawalId::new()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::LedgerUnavailable("down".into()).http_status_code(),
            503
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::Conflict("x".into()).is_retryable());
        assert!(LedgerError::LedgerUnavailable("x".into()).is_retryable());
        assert!(!LedgerError::InvalidAmount.is_retryable());
        assert!(
            !LedgerError::InsufficientBalance {
                requested: Money::new(1),
                available: Money::ZERO,
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientBalance {
            requested: Money::new(10_001),
            available: Money::new(10_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: requested 10001, available 10000"
        );
        let err = LedgerError::InvalidTransition {
            from: WithdrawalStatus::Completed,
            to: WithdrawalStatus::Processing,
        };
        assert_eq!(
            err.to_string(),
            "Invalid withdrawal status transition from completed to processing"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = LedgerError::InvalidAmount.into();
        assert_eq!(app.status_code(), 400);
        let app: AppError = LedgerError::InsufficientBalance {
            requested: Money::new(2),
            available: Money::new(1),
        }
        .into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");
        let app: AppError = LedgerError::LedgerUnavailable("db".into()).into();
        assert_eq!(app.status_code(), 503);
    }
}
