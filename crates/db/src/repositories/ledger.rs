//! PostgreSQL ledger store.
//!
//! Reservation runs in one database transaction: the creator's earning rows
//! are locked with `SELECT ... FOR UPDATE`, the plan is computed from the
//! locked snapshot, the request is inserted and the selected earnings are
//! flipped to `withdrawn` with a guarded, row-counted update. Any failure
//! drops the transaction, which rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payout_core::LedgerError;
use payout_core::earning::Earning;
use payout_core::store::LedgerStore;
use payout_core::withdrawal::{Reservation, WithdrawalRequest, WithdrawalStatus, settle};
use payout_shared::{UserId, WithdrawalId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, error};
use uuid::Uuid;

use super::convert::{
    earning_from_model, earning_to_active, withdrawal_from_model, withdrawal_to_active,
};
use crate::entities::sea_orm_active_enums::EarningStatus;
use crate::entities::{earnings, withdrawal_requests};
use crate::error::map_db_err;

/// [`LedgerStore`] backed by PostgreSQL through `SeaORM`.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    db: DatabaseConnection,
}

impl PgLedgerStore {
    /// Creates a new ledger store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn list_earnings_for_user(&self, user_id: UserId) -> Result<Vec<Earning>, LedgerError> {
        let rows = earnings::Entity::find()
            .filter(earnings::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(earnings::Column::CreatedAt)
            .order_by_asc(earnings::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(earning_from_model).collect())
    }

    async fn insert_earning(&self, earning: &Earning) -> Result<(), LedgerError> {
        earnings::Entity::insert(earning_to_active(earning))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn reserve_withdrawal(
        &self,
        reservation: &Reservation,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let user_id = reservation.draft.user_id;
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let rows = earnings::Entity::find()
            .filter(earnings::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(earnings::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(map_db_err)?;
        let snapshot: Vec<Earning> = rows.into_iter().map(earning_from_model).collect();

        let request = reservation.plan(&snapshot)?;

        withdrawal_requests::Entity::insert(withdrawal_to_active(&request)?)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let selected: Vec<Uuid> = request
            .earning_ids
            .iter()
            .map(|id| id.into_inner())
            .collect();
        let marked = earnings::Entity::update_many()
            .col_expr(
                earnings::Column::Status,
                Expr::value(EarningStatus::Withdrawn.to_value()),
            )
            .col_expr(
                earnings::Column::WithdrawalId,
                Expr::value(request.id.into_inner()),
            )
            .filter(earnings::Column::Id.is_in(selected.clone()))
            .filter(earnings::Column::Status.ne(EarningStatus::Withdrawn.to_value()))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if usize::try_from(marked.rows_affected).ok() != Some(selected.len()) {
            error!(
                user_id = %user_id,
                withdrawal_id = %request.id,
                expected = selected.len(),
                marked = marked.rows_affected,
                "Earnings changed under reservation lock"
            );
            return Err(LedgerError::Conflict(format!(
                "expected to reserve {} earnings, marked {}",
                selected.len(),
                marked.rows_affected
            )));
        }

        txn.commit().await.map_err(map_db_err)?;

        debug!(
            user_id = %user_id,
            withdrawal_id = %request.id,
            earnings = selected.len(),
            "Reservation committed"
        );
        Ok(request)
    }

    async fn find_withdrawal(
        &self,
        id: WithdrawalId,
    ) -> Result<Option<WithdrawalRequest>, LedgerError> {
        withdrawal_requests::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(withdrawal_from_model)
            .transpose()
    }

    async fn list_withdrawals_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<WithdrawalRequest>, LedgerError> {
        withdrawal_requests::Entity::find()
            .filter(withdrawal_requests::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(withdrawal_requests::Column::CreatedAt)
            .order_by_desc(withdrawal_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(withdrawal_from_model)
            .collect()
    }

    async fn update_withdrawal_status(
        &self,
        id: WithdrawalId,
        to: WithdrawalStatus,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = withdrawal_requests::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::WithdrawalNotFound(id))?;

        let current = withdrawal_from_model(model.clone())?;
        let updated = settle(&current, to, reason, now)?;

        let mut active: withdrawal_requests::ActiveModel = model.into();
        active.status = Set(updated.status.into());
        active.failure_reason = Set(updated.failure_reason.clone());
        active.updated_at = Set(updated.updated_at.into());
        active.update(&txn).await.map_err(map_db_err)?;

        if updated.status == WithdrawalStatus::Failed {
            let released = earnings::Entity::update_many()
                .col_expr(
                    earnings::Column::Status,
                    Expr::value(EarningStatus::Available.to_value()),
                )
                .col_expr(earnings::Column::WithdrawalId, Expr::value(Option::<Uuid>::None))
                .filter(earnings::Column::WithdrawalId.eq(id.into_inner()))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            debug!(
                withdrawal_id = %id,
                released = released.rows_affected,
                "Released earnings of failed withdrawal"
            );
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(updated)
    }
}
