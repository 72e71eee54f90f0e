//! Earning domain types.
//!
//! An earning is one accrual of creator revenue from a single source event.
//! Earnings are append-only; only the withdrawal state machine mutates their
//! status.

use chrono::{DateTime, Utc};
use payout_shared::{EarningId, Money, UserId, WithdrawalId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::hold::{HoldPolicy, ledger_instant};

/// Origin of an earning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningSourceType {
    /// A direct tip.
    Tip,
    /// A highlighted paid chat message.
    Superchat,
    /// A share of pooled subscription revenue.
    SubscriptionPool,
}

impl EarningSourceType {
    /// Returns the string representation of the source type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tip => "tip",
            Self::Superchat => "superchat",
            Self::SubscriptionPool => "subscription_pool",
        }
    }

    /// Parses a source type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tip" => Some(Self::Tip),
            "superchat" => Some(Self::Superchat),
            "subscription_pool" => Some(Self::SubscriptionPool),
            _ => None,
        }
    }
}

impl fmt::Display for EarningSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// External processor that collected the gross amount. Kept for audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    /// Stripe.
    Stripe,
    /// CCBill.
    Ccbill,
}

impl PaymentProvider {
    /// Returns the string representation of the provider.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Ccbill => "ccbill",
        }
    }

    /// Parses a provider from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stripe" => Some(Self::Stripe),
            "ccbill" => Some(Self::Ccbill),
            _ => None,
        }
    }
}

/// Settlement state of the upstream payment that produced an earning.
///
/// Only `Completed` payments count toward any balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Charge not yet settled.
    Pending,
    /// Charge settled.
    #[default]
    Completed,
    /// Charge failed or was reversed.
    Failed,
}

impl PaymentState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Ledger status of an earning.
///
/// `Pending` earnings become logically available once their hold ends; the
/// persisted status is not required to follow eagerly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarningStatus {
    /// Inside the hold window (as persisted).
    Pending,
    /// Past the hold window and not consumed.
    Available,
    /// Consumed by a withdrawal.
    Withdrawn,
}

impl EarningStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Available => "available",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "available" => Some(Self::Available),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }
}

impl fmt::Display for EarningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for appending an earning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEarning {
    /// Owning creator.
    pub user_id: UserId,
    /// Where the money came from.
    pub source_type: EarningSourceType,
    /// Originating event (tip id, pool run id, ...).
    #[serde(default)]
    pub source_id: Option<Uuid>,
    /// Amount charged to the payer.
    pub gross_amount: Money,
    /// Platform's cut.
    pub platform_fee: Money,
    /// Processor that collected the charge.
    #[serde(default)]
    pub payment_provider: Option<PaymentProvider>,
    /// Upstream settlement state.
    #[serde(default)]
    pub payment_state: PaymentState,
}

impl NewEarning {
    /// Checks amount invariants and returns the net amount.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative amounts or a fee above the gross.
    pub fn net_amount(&self) -> Result<Money, LedgerError> {
        if self.gross_amount.is_negative() || self.platform_fee.is_negative() {
            return Err(LedgerError::InvalidInput(
                "earning amounts must be non-negative".to_string(),
            ));
        }

        let net = self
            .gross_amount
            .checked_sub(self.platform_fee)
            .ok_or(LedgerError::Overflow)?;
        if net.is_negative() {
            return Err(LedgerError::InvalidInput(format!(
                "platform fee {} exceeds gross amount {}",
                self.platform_fee, self.gross_amount
            )));
        }

        Ok(net)
    }
}

/// One accrual event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earning {
    /// Earning ID.
    pub id: EarningId,
    /// Owning creator.
    pub user_id: UserId,
    /// Source type.
    pub source_type: EarningSourceType,
    /// Originating event.
    pub source_id: Option<Uuid>,
    /// Gross amount in minor units.
    pub gross_amount: Money,
    /// Platform fee in minor units.
    pub platform_fee: Money,
    /// `gross_amount - platform_fee`.
    pub net_amount: Money,
    /// Processor that collected the charge.
    pub payment_provider: Option<PaymentProvider>,
    /// Upstream settlement state.
    pub payment_state: PaymentState,
    /// Ledger status.
    pub status: EarningStatus,
    /// Withdrawal that consumed this earning.
    pub withdrawal_id: Option<WithdrawalId>,
    /// Accrual instant.
    pub created_at: DateTime<Utc>,
    /// End of the hold window.
    pub available_at: DateTime<Utc>,
}

impl Earning {
    /// Builds a new `Pending` earning accrued at `created_at`.
    ///
    /// `created_at` is truncated to milliseconds before the hold is applied.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the amounts are inconsistent or the hold end
    /// cannot be represented.
    pub fn accrue(
        input: NewEarning,
        created_at: DateTime<Utc>,
        hold: &HoldPolicy,
    ) -> Result<Self, LedgerError> {
        let net_amount = input.net_amount()?;
        let created_at = ledger_instant(created_at);
        let available_at = hold.available_at(created_at)?;

        Ok(Self {
            id: EarningId::new(),
            user_id: input.user_id,
            source_type: input.source_type,
            source_id: input.source_id,
            gross_amount: input.gross_amount,
            platform_fee: input.platform_fee,
            net_amount,
            payment_provider: input.payment_provider,
            payment_state: input.payment_state,
            status: EarningStatus::Pending,
            withdrawal_id: None,
            created_at,
            available_at,
        })
    }

    /// Returns true if the earning counts toward available or pending balance.
    #[must_use]
    pub fn is_outstanding(&self) -> bool {
        self.payment_state == PaymentState::Completed && self.status != EarningStatus::Withdrawn
    }

    /// Returns true if the hold window has ended at `now`.
    #[must_use]
    pub fn hold_elapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.available_at
    }

    /// Returns true if the earning can be consumed by a withdrawal at `now`.
    #[must_use]
    pub fn is_withdrawable(&self, now: DateTime<Utc>) -> bool {
        self.is_outstanding() && self.hold_elapsed(now)
    }

    /// Status as of `now`, promoting held earnings whose hold has ended.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> EarningStatus {
        match self.status {
            EarningStatus::Pending if self.hold_elapsed(now) => EarningStatus::Available,
            status => status,
        }
    }
}
