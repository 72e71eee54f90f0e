//! Persistence seam for the ledger.
//!
//! The service talks to earnings and withdrawals only through [`LedgerStore`].
//! `payout-db` provides the PostgreSQL implementation; [`MemoryLedgerStore`]
//! is the embedded one.

mod memory;

pub use memory::MemoryLedgerStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payout_shared::{UserId, WithdrawalId};

use crate::earning::Earning;
use crate::error::LedgerError;
use crate::withdrawal::{Reservation, WithdrawalRequest, WithdrawalStatus};

/// Earning and withdrawal persistence.
///
/// `reserve_withdrawal` and `update_withdrawal_status` are each one atomic
/// unit: either every write they make lands, or none does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All earnings of a creator, in any status.
    async fn list_earnings_for_user(&self, user_id: UserId) -> Result<Vec<Earning>, LedgerError>;

    /// Appends an earning.
    async fn insert_earning(&self, earning: &Earning) -> Result<(), LedgerError>;

    /// Locks the creator's earnings, plans the reservation against them,
    /// marks the selected earnings withdrawn and inserts the request.
    ///
    /// Returns `Conflict` when a concurrent writer won the race.
    async fn reserve_withdrawal(
        &self,
        reservation: &Reservation,
    ) -> Result<WithdrawalRequest, LedgerError>;

    /// Looks up a withdrawal request.
    async fn find_withdrawal(
        &self,
        id: WithdrawalId,
    ) -> Result<Option<WithdrawalRequest>, LedgerError>;

    /// All withdrawal requests of a creator, newest first.
    async fn list_withdrawals_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<WithdrawalRequest>, LedgerError>;

    /// Moves a processing request to `completed` or `failed`.
    ///
    /// Failing releases the request's earnings back to available.
    async fn update_withdrawal_status(
        &self,
        id: WithdrawalId,
        to: WithdrawalStatus,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError>;
}
