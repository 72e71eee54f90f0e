//! Row <-> domain conversions.

use chrono::Utc;
use payout_core::LedgerError;
use payout_core::earning::Earning;
use payout_core::withdrawal::{WithdrawalMethod, WithdrawalRequest};
use payout_shared::{EarningId, Money, UserId, WithdrawalId};
use sea_orm::Set;
use uuid::Uuid;

use crate::entities::{earnings, withdrawal_requests};

fn corrupt(table: &str, id: Uuid, detail: impl std::fmt::Display) -> LedgerError {
    LedgerError::LedgerUnavailable(format!("corrupt {table} row {id}: {detail}"))
}

/// Builds a domain earning from its row.
pub fn earning_from_model(model: earnings::Model) -> Earning {
    Earning {
        id: EarningId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        source_type: model.source_type.into(),
        source_id: model.source_id,
        gross_amount: Money::new(model.gross_amount),
        platform_fee: Money::new(model.platform_fee),
        net_amount: Money::new(model.net_amount),
        payment_provider: model.payment_provider.map(Into::into),
        payment_state: model.payment_state.into(),
        status: model.status.into(),
        withdrawal_id: model.withdrawal_id.map(WithdrawalId::from_uuid),
        created_at: model.created_at.with_timezone(&Utc),
        available_at: model.available_at.with_timezone(&Utc),
    }
}

/// Insertable row for a new earning.
pub fn earning_to_active(earning: &Earning) -> earnings::ActiveModel {
    earnings::ActiveModel {
        id: Set(earning.id.into_inner()),
        user_id: Set(earning.user_id.into_inner()),
        source_type: Set(earning.source_type.into()),
        source_id: Set(earning.source_id),
        gross_amount: Set(earning.gross_amount.minor_units()),
        platform_fee: Set(earning.platform_fee.minor_units()),
        net_amount: Set(earning.net_amount.minor_units()),
        payment_provider: Set(earning.payment_provider.map(Into::into)),
        payment_state: Set(earning.payment_state.into()),
        status: Set(earning.status.into()),
        withdrawal_id: Set(earning.withdrawal_id.map(WithdrawalId::into_inner)),
        created_at: Set(earning.created_at.into()),
        available_at: Set(earning.available_at.into()),
    }
}

/// Builds a domain request from its row.
///
/// # Errors
///
/// Returns `LedgerUnavailable` if a JSON column does not decode.
pub fn withdrawal_from_model(
    model: withdrawal_requests::Model,
) -> Result<WithdrawalRequest, LedgerError> {
    let method: WithdrawalMethod = serde_json::from_value(model.method)
        .map_err(|e| corrupt("withdrawal_requests", model.id, e))?;
    let earning_ids: Vec<EarningId> = serde_json::from_value(model.earning_ids)
        .map_err(|e| corrupt("withdrawal_requests", model.id, e))?;

    Ok(WithdrawalRequest {
        id: WithdrawalId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        requested_amount: Money::new(model.requested_amount),
        method,
        fee: Money::new(model.fee),
        net_amount: Money::new(model.net_amount),
        status: model.status.into(),
        earning_ids,
        failure_reason: model.failure_reason,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

/// Insertable row for a new request.
///
/// # Errors
///
/// Returns `InvalidInput` if the method or earning list does not encode.
pub fn withdrawal_to_active(
    request: &WithdrawalRequest,
) -> Result<withdrawal_requests::ActiveModel, LedgerError> {
    let encode_err = |e: serde_json::Error| LedgerError::InvalidInput(e.to_string());

    Ok(withdrawal_requests::ActiveModel {
        id: Set(request.id.into_inner()),
        user_id: Set(request.user_id.into_inner()),
        requested_amount: Set(request.requested_amount.minor_units()),
        method_type: Set(request.method.kind().into()),
        method: Set(serde_json::to_value(&request.method).map_err(encode_err)?),
        fee: Set(request.fee.minor_units()),
        net_amount: Set(request.net_amount.minor_units()),
        status: Set(request.status.into()),
        earning_ids: Set(serde_json::to_value(&request.earning_ids).map_err(encode_err)?),
        failure_reason: Set(request.failure_reason.clone()),
        created_at: Set(request.created_at.into()),
        updated_at: Set(request.updated_at.into()),
    })
}
