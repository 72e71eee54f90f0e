//! `SeaORM` Entity for withdrawal_requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{WithdrawalMethodType, WithdrawalStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub requested_amount: i64,
    pub method_type: WithdrawalMethodType,
    /// Sanitized method details, tagged by `type`.
    #[sea_orm(column_type = "JsonBinary")]
    pub method: Json,
    pub fee: i64,
    pub net_amount: i64,
    pub status: WithdrawalStatus,
    /// Earnings consumed at reservation time. Kept after a failure releases them.
    #[sea_orm(column_type = "JsonBinary")]
    pub earning_ids: Json,
    pub failure_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::earnings::Entity")]
    Earnings,
}

impl Related<super::earnings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Earnings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
