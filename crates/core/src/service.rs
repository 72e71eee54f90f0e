//! Ledger service.
//!
//! Composes the pure ledger rules with a [`LedgerStore`]. All operations take
//! the evaluation instant explicitly so callers and tests control the clock.

use chrono::{DateTime, Utc};
use payout_shared::{Money, UserId, WithdrawalId};
use tracing::{error, info, warn};

use crate::earning::{Earning, EarningsStats, NewEarning, available_balance, compute_stats};
use crate::error::LedgerError;
use crate::policy::LedgerPolicy;
use crate::store::LedgerStore;
use crate::withdrawal::{
    Reservation, WithdrawalDraft, WithdrawalMethodInput, WithdrawalQuote, WithdrawalRequest,
    WithdrawalStatus, validate_amount_with_minimum, validate_withdrawal_method,
};

/// Store attempts per reservation: the first try plus one retry.
const RESERVE_ATTEMPTS: u32 = 2;

/// Creator ledger operations over a store.
#[derive(Debug)]
pub struct LedgerService<S> {
    store: S,
    policy: LedgerPolicy,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a service over `store` with `policy`.
    pub fn new(store: S, policy: LedgerPolicy) -> Self {
        Self { store, policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Balance snapshot for a creator as of `now`.
    pub async fn get_stats(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<EarningsStats, LedgerError> {
        let earnings = self.store.list_earnings_for_user(user_id).await?;
        compute_stats(&earnings, now, &self.policy.hold)
    }

    /// Appends an earning accrued at `now`. It starts in the hold window.
    pub async fn record_earning(
        &self,
        input: NewEarning,
        now: DateTime<Utc>,
    ) -> Result<Earning, LedgerError> {
        let earning = Earning::accrue(input, now, &self.policy.hold)?;
        self.store.insert_earning(&earning).await?;

        info!(
            user_id = %earning.user_id,
            earning_id = %earning.id,
            source_type = %earning.source_type,
            net_amount = %earning.net_amount,
            available_at = %earning.available_at,
            "Earning recorded"
        );
        Ok(earning)
    }

    /// Validates a withdrawal against the live balance and quotes its fee.
    ///
    /// Nothing is reserved. The method is checked first, then the amount.
    pub async fn validate_withdrawal(
        &self,
        user_id: UserId,
        amount: Money,
        method: Option<&WithdrawalMethodInput>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalQuote, LedgerError> {
        let method = validate_withdrawal_method(method)?;
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }

        let available = self.available(user_id, now).await?;
        validate_amount_with_minimum(amount, available, self.policy.minimum_withdrawal)?;

        let kind = method.kind();
        let fee = self.policy.fees.fee_for(amount, kind)?;
        let net_amount = self.policy.fees.net_payout(amount, kind)?;

        Ok(WithdrawalQuote {
            amount,
            fee,
            net_amount,
            method,
        })
    }

    /// Validates a withdrawal and atomically reserves the earnings it consumes.
    ///
    /// The returned request is `processing`. A store conflict or outage is
    /// retried once; a conflict that persists is reported as
    /// `InsufficientBalance`.
    pub async fn submit_withdrawal(
        &self,
        user_id: UserId,
        amount: Money,
        method: Option<&WithdrawalMethodInput>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let quote = match self.validate_withdrawal(user_id, amount, method, now).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(user_id = %user_id, amount = %amount, error = %e, "Withdrawal rejected");
                return Err(e);
            }
        };

        let reservation = Reservation {
            draft: WithdrawalDraft {
                id: WithdrawalId::new(),
                user_id,
                quote,
            },
            now,
        };

        let mut attempt = 1;
        loop {
            match self.store.reserve_withdrawal(&reservation).await {
                Ok(request) => {
                    info!(
                        user_id = %user_id,
                        withdrawal_id = %request.id,
                        amount = %request.requested_amount,
                        fee = %request.fee,
                        net_amount = %request.net_amount,
                        earnings = request.earning_ids.len(),
                        "Withdrawal submitted"
                    );
                    return Ok(request);
                }
                Err(e) if e.is_retryable() && attempt < RESERVE_ATTEMPTS => {
                    warn!(
                        user_id = %user_id,
                        withdrawal_id = %reservation.draft.id,
                        error = %e,
                        "Reservation failed, retrying"
                    );
                    attempt += 1;
                }
                Err(LedgerError::Conflict(reason)) => {
                    warn!(
                        user_id = %user_id,
                        withdrawal_id = %reservation.draft.id,
                        reason = %reason,
                        "Reservation lost a concurrent race"
                    );
                    let available = self.available(user_id, now).await?;
                    return Err(LedgerError::InsufficientBalance {
                        requested: amount,
                        available,
                    });
                }
                Err(e @ LedgerError::LedgerUnavailable(_)) => {
                    error!(
                        user_id = %user_id,
                        withdrawal_id = %reservation.draft.id,
                        error = %e,
                        "Ledger store failed during reservation"
                    );
                    return Err(e);
                }
                Err(e) => {
                    warn!(user_id = %user_id, amount = %amount, error = %e, "Withdrawal rejected");
                    return Err(e);
                }
            }
        }
    }

    /// Marks a processing withdrawal as paid out.
    pub async fn complete_withdrawal(
        &self,
        id: WithdrawalId,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let request = self
            .store
            .update_withdrawal_status(id, WithdrawalStatus::Completed, None, now)
            .await?;
        info!(
            user_id = %request.user_id,
            withdrawal_id = %request.id,
            net_amount = %request.net_amount,
            "Withdrawal completed"
        );
        Ok(request)
    }

    /// Marks a processing withdrawal as rejected by the rail and releases its
    /// earnings back to the available balance.
    pub async fn fail_withdrawal(
        &self,
        id: WithdrawalId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let request = self
            .store
            .update_withdrawal_status(id, WithdrawalStatus::Failed, Some(reason), now)
            .await?;
        info!(
            user_id = %request.user_id,
            withdrawal_id = %request.id,
            released = request.earning_ids.len(),
            reason = request.failure_reason.as_deref().unwrap_or(""),
            "Withdrawal failed"
        );
        Ok(request)
    }

    /// A creator's withdrawal requests, newest first.
    pub async fn list_withdrawals(
        &self,
        user_id: UserId,
    ) -> Result<Vec<WithdrawalRequest>, LedgerError> {
        self.store.list_withdrawals_for_user(user_id).await
    }

    async fn available(&self, user_id: UserId, now: DateTime<Utc>) -> Result<Money, LedgerError> {
        let earnings = self.store.list_earnings_for_user(user_id).await?;
        available_balance(&earnings, now)
    }
}
