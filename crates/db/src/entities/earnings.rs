//! `SeaORM` Entity for earnings table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EarningSourceType, EarningStatus, PaymentProvider, PaymentState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "earnings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub source_type: EarningSourceType,
    pub source_id: Option<Uuid>,
    pub gross_amount: i64,
    pub platform_fee: i64,
    pub net_amount: i64,
    pub payment_provider: Option<PaymentProvider>,
    pub payment_state: PaymentState,
    pub status: EarningStatus,
    pub withdrawal_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub available_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::withdrawal_requests::Entity",
        from = "Column::WithdrawalId",
        to = "super::withdrawal_requests::Column::Id"
    )]
    WithdrawalRequests,
}

impl Related<super::withdrawal_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WithdrawalRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
