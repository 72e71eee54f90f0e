//! Read-side balance aggregation over a creator's earnings.
//!
//! These are pure functions over a snapshot: no locking, no side effects.
//! Totals use checked `i64` arithmetic and fail with `Overflow` instead of
//! wrapping.

use chrono::{DateTime, Utc};
use payout_shared::Money;
use serde::{Deserialize, Serialize};

use super::types::{Earning, EarningSourceType, EarningStatus, PaymentState};
use crate::error::LedgerError;
use crate::hold::HoldPolicy;

/// Lifetime net earnings per source type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    /// Tips.
    pub tips: Money,
    /// Superchat payments.
    pub superchat: Money,
    /// Subscription pool shares.
    pub subscription_pool: Money,
}

/// Balance snapshot for one creator as of an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsStats {
    /// Sum of earnings past their hold, not yet withdrawn.
    pub available_balance: Money,
    /// Sum of earnings still inside their hold.
    pub pending_balance: Money,
    /// Sum of earnings created since the first day of the current month.
    pub this_month_earnings: Money,
    /// Sum of earnings consumed by withdrawals.
    pub total_withdrawn: Money,
    /// Lifetime totals per source.
    pub breakdown: SourceBreakdown,
    /// Instant the snapshot was computed for.
    #[serde(with = "millis_rfc3339")]
    pub as_of: DateTime<Utc>,
}

fn sum_where<F>(earnings: &[Earning], predicate: F) -> Result<Money, LedgerError>
where
    F: Fn(&Earning) -> bool,
{
    Money::checked_sum(
        earnings
            .iter()
            .filter(|e| predicate(e))
            .map(|e| e.net_amount),
    )
    .ok_or(LedgerError::Overflow)
}

/// Sum of completed, unwithdrawn earnings whose hold has ended at `now`.
///
/// # Errors
///
/// Returns `Overflow` if the total does not fit in `i64`.
pub fn available_balance(earnings: &[Earning], now: DateTime<Utc>) -> Result<Money, LedgerError> {
    sum_where(earnings, |e| e.is_outstanding() && e.hold_elapsed(now))
}

/// Sum of completed, unwithdrawn earnings still inside their hold at `now`.
///
/// # Errors
///
/// Returns `Overflow` if the total does not fit in `i64`.
pub fn pending_balance(earnings: &[Earning], now: DateTime<Utc>) -> Result<Money, LedgerError> {
    sum_where(earnings, |e| e.is_outstanding() && !e.hold_elapsed(now))
}

/// Sum of earnings consumed by withdrawals.
///
/// # Errors
///
/// Returns `Overflow` if the total does not fit in `i64`.
pub fn total_withdrawn(earnings: &[Earning]) -> Result<Money, LedgerError> {
    sum_where(earnings, |e| e.status == EarningStatus::Withdrawn)
}

/// Sum of completed earnings created on or after the first day of `now`'s
/// month, regardless of hold or withdrawal status.
///
/// # Errors
///
/// Returns `Overflow` if the total does not fit in `i64`.
pub fn this_month_earnings(
    earnings: &[Earning],
    now: DateTime<Utc>,
    hold: &HoldPolicy,
) -> Result<Money, LedgerError> {
    let month_start = hold.month_start(now);
    sum_where(earnings, |e| {
        e.payment_state == PaymentState::Completed && e.created_at >= month_start
    })
}

/// Lifetime completed earnings per source.
///
/// # Errors
///
/// Returns `Overflow` if any total does not fit in `i64`.
pub fn source_breakdown(earnings: &[Earning]) -> Result<SourceBreakdown, LedgerError> {
    let by_source = |source: EarningSourceType| {
        sum_where(earnings, move |e| {
            e.payment_state == PaymentState::Completed && e.source_type == source
        })
    };

    Ok(SourceBreakdown {
        tips: by_source(EarningSourceType::Tip)?,
        superchat: by_source(EarningSourceType::Superchat)?,
        subscription_pool: by_source(EarningSourceType::SubscriptionPool)?,
    })
}

/// Computes the full balance snapshot.
///
/// # Errors
///
/// Returns `Overflow` if any total does not fit in `i64`.
pub fn compute_stats(
    earnings: &[Earning],
    now: DateTime<Utc>,
    hold: &HoldPolicy,
) -> Result<EarningsStats, LedgerError> {
    Ok(EarningsStats {
        available_balance: available_balance(earnings, now)?,
        pending_balance: pending_balance(earnings, now)?,
        this_month_earnings: this_month_earnings(earnings, now, hold)?,
        total_withdrawn: total_withdrawn(earnings)?,
        breakdown: source_breakdown(earnings)?,
        as_of: now,
    })
}

/// RFC 3339 with millisecond precision and an explicit `Z`.
mod millis_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
