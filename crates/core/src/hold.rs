//! Hold-period policy.
//!
//! Earnings become withdrawable a fixed number of *calendar* days after they
//! accrue. Days are counted on the wall clock of a reference timezone, so the
//! time of day is preserved across month ends, year ends and DST changes.

use chrono::{DateTime, Datelike, Days, SubsecRound, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::LedgerError;

/// Mandatory hold before an earning can be withdrawn.
pub const HOLD_PERIOD_DAYS: u32 = 14;

/// Maps accrual instants to their earliest-withdrawable instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldPolicy {
    hold_days: u32,
    timezone: Tz,
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self::new(HOLD_PERIOD_DAYS, chrono_tz::UTC)
    }
}

impl HoldPolicy {
    /// Creates a policy holding for `hold_days` calendar days in `timezone`.
    #[must_use]
    pub const fn new(hold_days: u32, timezone: Tz) -> Self {
        Self {
            hold_days,
            timezone,
        }
    }

    /// Number of calendar days in the hold.
    #[must_use]
    pub const fn hold_days(&self) -> u32 {
        self.hold_days
    }

    /// Timezone whose calendar the hold is counted in.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the instant at which an earning created at `created_at`
    /// becomes withdrawable.
    ///
    /// When the target wall-clock time falls in a DST gap the exact elapsed
    /// duration is used instead; when it is ambiguous the earlier instant wins.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the result is outside the representable range.
    pub fn available_at(&self, created_at: DateTime<Utc>) -> Result<DateTime<Utc>, LedgerError> {
        let out_of_range =
            || LedgerError::InvalidInput(format!("available date out of range for {created_at}"));

        let local = created_at.with_timezone(&self.timezone).naive_local();
        let target = local
            .checked_add_days(Days::new(u64::from(self.hold_days)))
            .ok_or_else(out_of_range)?;

        match self.timezone.from_local_datetime(&target).earliest() {
            Some(resolved) => Ok(resolved.with_timezone(&Utc)),
            None => created_at
                .checked_add_signed(TimeDelta::days(i64::from(self.hold_days)))
                .ok_or_else(out_of_range),
        }
    }

    /// Returns true once `now` has reached the end of the hold.
    ///
    /// The boundary is inclusive. Future-dated earnings are never available
    /// early, and unrepresentable dates are treated as still held.
    #[must_use]
    pub fn is_available(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.available_at(created_at).is_ok_and(|at| now >= at)
    }

    /// Returns midnight of the first calendar day of `now`'s month.
    #[must_use]
    pub fn month_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.timezone).date_naive();
        let first = local.with_day(1).unwrap_or(local);
        let midnight = first.and_time(chrono::NaiveTime::MIN);

        self.timezone
            .from_local_datetime(&midnight)
            .earliest()
            .map_or_else(|| Utc.from_utc_datetime(&midnight), |t| t.with_timezone(&Utc))
    }
}

/// Truncates `at` to the millisecond precision the ledger records.
///
/// Every instant stored on an earning or withdrawal passes through here, so
/// the value a caller gets back equals the value a store reads back.
#[must_use]
pub fn ledger_instant(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// Returns `created_at` plus the standard 14-day hold, counted in UTC.
///
/// # Errors
///
/// Returns `InvalidInput` if the result is outside the representable range.
pub fn calculate_available_date(created_at: DateTime<Utc>) -> Result<DateTime<Utc>, LedgerError> {
    HoldPolicy::default().available_at(created_at)
}

/// Returns true if an earning created at `created_at` is withdrawable at `now`.
#[must_use]
pub fn is_available_for_withdrawal(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    HoldPolicy::default().is_available(created_at, now)
}

/// Parses an RFC 3339 instant supplied by an untyped caller.
///
/// # Errors
///
/// Returns `InvalidInput` for missing, empty, or unparseable input.
pub fn parse_instant(raw: Option<&str>) -> Result<DateTime<Utc>, LedgerError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LedgerError::InvalidInput("date is required".to_string()))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LedgerError::InvalidInput(format!("invalid date '{raw}': {e}")))
}
