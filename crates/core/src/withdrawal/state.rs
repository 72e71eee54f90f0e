//! Withdrawal state machine and earning reservation.
//!
//! Reservation is planned here as a pure function of an earnings snapshot.
//! Stores run the plan inside their atomic boundary and persist the result.

use chrono::{DateTime, Utc};
use payout_shared::{EarningId, Money};
use std::collections::HashMap;

use super::types::{WithdrawalDraft, WithdrawalRequest, WithdrawalStatus};
use crate::earning::{Earning, available_balance};
use crate::error::LedgerError;
use crate::hold::ledger_instant;

/// Upper bound on partial-sum updates performed by the exact-cover search.
///
/// Each candidate costs one update per sum reachable before it, so this caps
/// the total work done while a creator's earnings are locked.
pub const MAX_SEARCH_STEPS: usize = 2_000_000;

/// Stateless transition rules for withdrawal requests.
pub struct WithdrawalStateMachine;

impl WithdrawalStateMachine {
    /// Returns true if `from → to` is a legal transition.
    #[must_use]
    pub fn can_transition(from: WithdrawalStatus, to: WithdrawalStatus) -> bool {
        matches!(
            (from, to),
            (WithdrawalStatus::Validated, WithdrawalStatus::Processing)
                | (WithdrawalStatus::Processing, WithdrawalStatus::Completed | WithdrawalStatus::Failed)
        )
    }

    /// Validates `from → to` and returns the new status.
    pub fn transition(
        from: WithdrawalStatus,
        to: WithdrawalStatus,
    ) -> Result<WithdrawalStatus, LedgerError> {
        if Self::can_transition(from, to) {
            Ok(to)
        } else {
            Err(LedgerError::InvalidTransition { from, to })
        }
    }
}

/// A validated draft plus the instant its reservation is evaluated at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// The validated withdrawal.
    pub draft: WithdrawalDraft,
    /// Evaluation instant for hold windows.
    pub now: DateTime<Utc>,
}

impl Reservation {
    /// Plans this reservation against a locked earnings snapshot.
    pub fn plan(&self, earnings: &[Earning]) -> Result<WithdrawalRequest, LedgerError> {
        plan_reservation(&self.draft, earnings, self.now)
    }
}

/// Re-verifies the balance and selects the earnings a withdrawal consumes.
///
/// Returns the request in `processing` with `earning_ids` set. The selected
/// earnings sum exactly to the requested amount; partial consumption is not
/// supported.
///
/// # Errors
///
/// Returns `InsufficientBalance` when the live balance is too low or no
/// combination of whole earnings covers the amount exactly.
pub fn plan_reservation(
    draft: &WithdrawalDraft,
    earnings: &[Earning],
    now: DateTime<Utc>,
) -> Result<WithdrawalRequest, LedgerError> {
    let requested = draft.quote.amount;
    let available = available_balance(earnings, now)?;
    let insufficient = || LedgerError::InsufficientBalance {
        requested,
        available,
    };

    if !requested.is_positive() {
        return Err(LedgerError::InvalidAmount);
    }
    if requested > available {
        return Err(insufficient());
    }

    let mut candidates: Vec<&Earning> = earnings
        .iter()
        .filter(|e| e.user_id == draft.user_id && e.is_withdrawable(now) && e.net_amount.is_positive())
        .collect();
    candidates.sort_by(|a, b| {
        (a.available_at, a.created_at, a.id).cmp(&(b.available_at, b.created_at, b.id))
    });

    let earning_ids = select_exact(&candidates, requested).ok_or_else(insufficient)?;
    let stamped = ledger_instant(now);
    let status = WithdrawalStateMachine::transition(
        WithdrawalStatus::Validated,
        WithdrawalStatus::Processing,
    )?;

    Ok(WithdrawalRequest {
        id: draft.id,
        user_id: draft.user_id,
        requested_amount: requested,
        method: draft.quote.method.clone(),
        fee: draft.quote.fee,
        net_amount: draft.quote.net_amount,
        status,
        earning_ids,
        failure_reason: None,
        created_at: stamped,
        updated_at: stamped,
    })
}

/// Picks whole earnings summing exactly to `target`, oldest first.
///
/// Tries the oldest-first prefix, then a subset-sum search that visits
/// candidates in age order so older earnings win ties. Targets that are not a
/// multiple of the candidates' common divisor are rejected without searching,
/// and the search gives up after [`MAX_SEARCH_STEPS`] partial-sum updates.
fn select_exact(candidates: &[&Earning], target: Money) -> Option<Vec<EarningId>> {
    let target = target.minor_units();

    let mut running = 0i64;
    for (i, earning) in candidates.iter().enumerate() {
        running = running.checked_add(earning.net_amount.minor_units())?;
        if running == target {
            return Some(candidates[..=i].iter().map(|e| e.id).collect());
        }
        if running > target {
            break;
        }
    }
    if running < target {
        return None;
    }

    let divisor = candidates
        .iter()
        .map(|e| e.net_amount.minor_units())
        .fold(0, gcd);
    if divisor == 0 || target % divisor != 0 {
        return None;
    }

    // sum -> (candidate index, previous sum); the empty sum has no predecessor
    let mut reachable: HashMap<i64, Option<(usize, i64)>> = HashMap::from([(0, None)]);
    let mut steps = 0usize;
    for (i, earning) in candidates.iter().enumerate() {
        steps = steps.saturating_add(reachable.len());
        if steps > MAX_SEARCH_STEPS {
            tracing::warn!(
                target_amount = target,
                candidates = candidates.len(),
                visited = i,
                "Exact-cover search exceeded its step budget"
            );
            return None;
        }

        let value = earning.net_amount.minor_units();
        let frontier: Vec<i64> = reachable.keys().copied().collect();
        for sum in frontier {
            let Some(next) = sum.checked_add(value).filter(|n| *n <= target) else {
                continue;
            };
            reachable.entry(next).or_insert(Some((i, sum)));
        }
        if reachable.contains_key(&target) {
            break;
        }
    }

    let mut picked = Vec::new();
    let mut cursor = target;
    while let Some((index, previous)) = reachable.get(&cursor).copied().flatten() {
        picked.push(index);
        cursor = previous;
    }
    if cursor != 0 || picked.is_empty() {
        return None;
    }
    picked.sort_unstable();
    Some(picked.into_iter().map(|i| candidates[i].id).collect())
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Moves a processing request to `completed`.
pub fn complete(
    request: &WithdrawalRequest,
    now: DateTime<Utc>,
) -> Result<WithdrawalRequest, LedgerError> {
    let status = WithdrawalStateMachine::transition(request.status, WithdrawalStatus::Completed)?;
    Ok(WithdrawalRequest {
        status,
        updated_at: ledger_instant(now),
        ..request.clone()
    })
}

/// Moves a processing request to `failed`, recording the rail's reason.
///
/// The caller's store releases the consumed earnings back to available.
pub fn fail(
    request: &WithdrawalRequest,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<WithdrawalRequest, LedgerError> {
    let status = WithdrawalStateMachine::transition(request.status, WithdrawalStatus::Failed)?;
    Ok(WithdrawalRequest {
        status,
        failure_reason: Some(reason.trim().to_string()).filter(|r| !r.is_empty()),
        updated_at: ledger_instant(now),
        ..request.clone()
    })
}

/// Applies a terminal transition requested by the payout rail.
///
/// # Errors
///
/// Returns `InvalidTransition` for any target other than `completed` or
/// `failed`, or when the request is not processing.
pub fn settle(
    request: &WithdrawalRequest,
    to: WithdrawalStatus,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<WithdrawalRequest, LedgerError> {
    match to {
        WithdrawalStatus::Completed => complete(request, now),
        WithdrawalStatus::Failed => fail(request, reason.unwrap_or_default(), now),
        other => Err(LedgerError::InvalidTransition {
            from: request.status,
            to: other,
        }),
    }
}
