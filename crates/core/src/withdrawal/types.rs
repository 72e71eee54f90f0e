//! Withdrawal domain types.

use chrono::{DateTime, Utc};
use payout_shared::{EarningId, Money, UserId, WithdrawalId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Payout rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalMethodKind {
    /// Domestic bank transfer.
    BankTransfer,
    /// PayPal payout.
    Paypal,
}

impl WithdrawalMethodKind {
    /// Returns the string representation of the method kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::Paypal => "paypal",
        }
    }
}

impl FromStr for WithdrawalMethodKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank_transfer" => Ok(Self::BankTransfer),
            "paypal" => Ok(Self::Paypal),
            other => Err(LedgerError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for WithdrawalMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bank account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankAccountType {
    /// Checking account.
    Checking,
    /// Savings account.
    Savings,
}

impl BankAccountType {
    /// Parses an account type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            _ => None,
        }
    }
}

/// Untrusted withdrawal method payload as received from a client.
///
/// Accepts both `snake_case` and `camelCase` field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalMethodInput {
    /// Discriminator: `bank_transfer` or `paypal`.
    #[serde(rename = "type", default)]
    pub method_type: Option<String>,
    /// Bank name.
    #[serde(default, alias = "bankName")]
    pub bank_name: Option<String>,
    /// Account number.
    #[serde(default, alias = "accountNumber")]
    pub account_number: Option<String>,
    /// Account holder.
    #[serde(default, alias = "accountHolder")]
    pub account_holder: Option<String>,
    /// `checking` or `savings`.
    #[serde(default, alias = "accountType")]
    pub account_type: Option<String>,
    /// PayPal account email.
    #[serde(default, alias = "paypalEmail")]
    pub paypal_email: Option<String>,
}

/// Validated, sanitized withdrawal method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WithdrawalMethod {
    /// Bank transfer details.
    BankTransfer {
        /// Sanitized bank name.
        bank_name: String,
        /// Digits-only account number.
        account_number: String,
        /// Sanitized account holder.
        account_holder: String,
        /// Account type.
        account_type: BankAccountType,
    },
    /// PayPal details.
    Paypal {
        /// PayPal account email.
        paypal_email: String,
    },
}

impl WithdrawalMethod {
    /// Returns the payout rail of this method.
    #[must_use]
    pub fn kind(&self) -> WithdrawalMethodKind {
        match self {
            Self::BankTransfer { .. } => WithdrawalMethodKind::BankTransfer,
            Self::Paypal { .. } => WithdrawalMethodKind::Paypal,
        }
    }
}

/// Withdrawal request lifecycle.
///
/// The valid transitions are:
/// - Validated → Processing (reserve earnings)
/// - Processing → Completed (rail confirmed)
/// - Processing → Failed (rail rejected; earnings released)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Passed validation, nothing reserved yet.
    Validated,
    /// Earnings reserved, payout in flight.
    Processing,
    /// Payout confirmed.
    Completed,
    /// Payout rejected.
    Failed,
}

impl WithdrawalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validated => "validated",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "validated" => Some(Self::Validated),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fee and net payout for a validated withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalQuote {
    /// Requested amount.
    pub amount: Money,
    /// Rail fee.
    pub fee: Money,
    /// `amount - fee`.
    pub net_amount: Money,
    /// Sanitized method.
    pub method: WithdrawalMethod,
}

/// A validated withdrawal waiting for its earnings to be reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalDraft {
    /// Request ID, fixed before reservation so retries are traceable.
    pub id: WithdrawalId,
    /// Requesting creator.
    pub user_id: UserId,
    /// Validated quote.
    pub quote: WithdrawalQuote,
}

/// One payout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Request ID.
    pub id: WithdrawalId,
    /// Requesting creator.
    pub user_id: UserId,
    /// Requested amount.
    pub requested_amount: Money,
    /// Sanitized method.
    pub method: WithdrawalMethod,
    /// Rail fee.
    pub fee: Money,
    /// `requested_amount - fee`.
    pub net_amount: Money,
    /// Lifecycle status.
    pub status: WithdrawalStatus,
    /// Earnings consumed by this request.
    pub earning_ids: Vec<EarningId>,
    /// Rail rejection reason when failed.
    pub failure_reason: Option<String>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}
