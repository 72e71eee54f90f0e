//! Embedded ledger store.
//!
//! Each creator's earnings and withdrawals sit behind one async mutex, so a
//! reservation's read-plan-mark-insert sequence cannot interleave with
//! another writer for the same creator. Different creators never contend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use payout_shared::{Money, UserId, WithdrawalId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::LedgerStore;
use crate::earning::{Earning, EarningStatus};
use crate::error::LedgerError;
use crate::withdrawal::{Reservation, WithdrawalRequest, WithdrawalStatus, settle};

#[derive(Debug, Default)]
struct UserLedger {
    earnings: Vec<Earning>,
    withdrawals: Vec<WithdrawalRequest>,
}

/// In-process [`LedgerStore`] with per-creator locking.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    users: DashMap<UserId, Arc<Mutex<UserLedger>>>,
    withdrawal_owners: DashMap<WithdrawalId, UserId>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger for a write path, created on first use.
    fn ledger(&self, user_id: UserId) -> Arc<Mutex<UserLedger>> {
        Arc::clone(self.users.entry(user_id).or_default().value())
    }

    /// Ledger for a read path; unknown creators are not materialized.
    fn existing(&self, user_id: UserId) -> Option<Arc<Mutex<UserLedger>>> {
        self.users.get(&user_id).map(|ledger| Arc::clone(ledger.value()))
    }

    fn owner_of(&self, id: WithdrawalId) -> Option<UserId> {
        self.withdrawal_owners.get(&id).map(|owner| *owner)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn list_earnings_for_user(&self, user_id: UserId) -> Result<Vec<Earning>, LedgerError> {
        let Some(ledger) = self.existing(user_id) else {
            return Ok(Vec::new());
        };
        let guard = ledger.lock().await;
        Ok(guard.earnings.clone())
    }

    async fn insert_earning(&self, earning: &Earning) -> Result<(), LedgerError> {
        let ledger = self.ledger(earning.user_id);
        let mut guard = ledger.lock().await;
        if guard.earnings.iter().any(|e| e.id == earning.id) {
            return Err(LedgerError::InvalidInput(format!(
                "earning {} already recorded",
                earning.id
            )));
        }
        guard.earnings.push(earning.clone());
        Ok(())
    }

    async fn reserve_withdrawal(
        &self,
        reservation: &Reservation,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let user_id = reservation.draft.user_id;
        let Some(ledger) = self.existing(user_id) else {
            return Err(LedgerError::InsufficientBalance {
                requested: reservation.draft.quote.amount,
                available: Money::ZERO,
            });
        };
        let mut guard = ledger.lock().await;

        let request = reservation.plan(&guard.earnings)?;
        let selected: HashSet<_> = request.earning_ids.iter().copied().collect();

        for earning in guard
            .earnings
            .iter_mut()
            .filter(|e| selected.contains(&e.id))
        {
            earning.status = EarningStatus::Withdrawn;
            earning.withdrawal_id = Some(request.id);
        }
        guard.withdrawals.push(request.clone());
        self.withdrawal_owners.insert(request.id, user_id);

        Ok(request)
    }

    async fn find_withdrawal(
        &self,
        id: WithdrawalId,
    ) -> Result<Option<WithdrawalRequest>, LedgerError> {
        let Some(user_id) = self.owner_of(id) else {
            return Ok(None);
        };
        let Some(ledger) = self.existing(user_id) else {
            return Ok(None);
        };
        let guard = ledger.lock().await;
        Ok(guard.withdrawals.iter().find(|w| w.id == id).cloned())
    }

    async fn list_withdrawals_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<WithdrawalRequest>, LedgerError> {
        let Some(ledger) = self.existing(user_id) else {
            return Ok(Vec::new());
        };
        let guard = ledger.lock().await;
        let mut withdrawals = guard.withdrawals.clone();
        withdrawals.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(withdrawals)
    }

    async fn update_withdrawal_status(
        &self,
        id: WithdrawalId,
        to: WithdrawalStatus,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let user_id = self
            .owner_of(id)
            .ok_or(LedgerError::WithdrawalNotFound(id))?;
        let ledger = self
            .existing(user_id)
            .ok_or(LedgerError::WithdrawalNotFound(id))?;
        let mut guard = ledger.lock().await;

        let index = guard
            .withdrawals
            .iter()
            .position(|w| w.id == id)
            .ok_or(LedgerError::WithdrawalNotFound(id))?;
        let updated = settle(&guard.withdrawals[index], to, reason, now)?;

        if updated.status == WithdrawalStatus::Failed {
            for earning in guard
                .earnings
                .iter_mut()
                .filter(|e| e.withdrawal_id == Some(id))
            {
                earning.status = EarningStatus::Available;
                earning.withdrawal_id = None;
            }
        }
        guard.withdrawals[index] = updated.clone();

        Ok(updated)
    }
}
