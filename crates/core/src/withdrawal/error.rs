//! Withdrawal method validation errors.

use thiserror::Error;

/// Field-level failures for a withdrawal method payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    /// Method missing, type missing, or type unsupported.
    #[error("Invalid withdrawal method type: {0}")]
    InvalidMethodType(String),

    /// Bank transfer without a bank name.
    #[error("Bank name is required")]
    BankNameRequired,

    /// Bank transfer without an account number.
    #[error("Account number is required")]
    AccountNumberRequired,

    /// Account number contains a non-digit character.
    #[error("Account number must contain digits only")]
    InvalidAccountNumberFormat,

    /// Bank transfer without an account holder.
    #[error("Account holder is required")]
    AccountHolderRequired,

    /// Account type is not `checking` or `savings`.
    #[error("Account type must be checking or savings")]
    InvalidAccountType,

    /// PayPal payout without an email.
    #[error("PayPal email is required")]
    EmailRequired,

    /// PayPal email is not a valid address.
    #[error("Invalid email format")]
    InvalidEmailFormat,
}

impl MethodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMethodType(_) => "INVALID_METHOD_TYPE",
            Self::BankNameRequired => "BANK_NAME_REQUIRED",
            Self::AccountNumberRequired => "ACCOUNT_NUMBER_REQUIRED",
            Self::InvalidAccountNumberFormat => "INVALID_ACCOUNT_NUMBER_FORMAT",
            Self::AccountHolderRequired => "ACCOUNT_HOLDER_REQUIRED",
            Self::InvalidAccountType => "INVALID_ACCOUNT_TYPE",
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
        }
    }
}
