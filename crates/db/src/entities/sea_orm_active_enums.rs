//! Text-backed enums for the ledger tables.
//!
//! Columns are `TEXT` with CHECK constraints rather than native PostgreSQL
//! enums, so adding a variant needs only a constraint change.

use payout_core::earning::types::{
    EarningSourceType as DomainSourceType, EarningStatus as DomainEarningStatus,
    PaymentProvider as DomainPaymentProvider, PaymentState as DomainPaymentState,
};
use payout_core::withdrawal::types::{
    WithdrawalMethodKind as DomainMethodKind, WithdrawalStatus as DomainWithdrawalStatus,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where an earning came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EarningSourceType {
    /// One-off tip.
    #[sea_orm(string_value = "tip")]
    Tip,
    /// Paid chat message.
    #[sea_orm(string_value = "superchat")]
    Superchat,
    /// Share of pooled subscription revenue.
    #[sea_orm(string_value = "subscription_pool")]
    SubscriptionPool,
}

/// Processor that collected the charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentProvider {
    /// Stripe.
    #[sea_orm(string_value = "stripe")]
    Stripe,
    /// CCBill.
    #[sea_orm(string_value = "ccbill")]
    Ccbill,
}

/// Upstream settlement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentState {
    /// Charge not settled yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Charge settled.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Charge failed or was reversed.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Ledger status of an earning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EarningStatus {
    /// Inside the hold window.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Released, e.g. after a failed withdrawal.
    #[sea_orm(string_value = "available")]
    Available,
    /// Consumed by a withdrawal.
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

/// Payout rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum WithdrawalMethodType {
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// PayPal.
    #[sea_orm(string_value = "paypal")]
    Paypal,
}

/// Withdrawal request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum WithdrawalStatus {
    /// Validated, not reserved.
    #[sea_orm(string_value = "validated")]
    Validated,
    /// Earnings reserved.
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Paid out.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Rejected by the rail.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Generates lossless conversions between a column enum and its domain twin.
macro_rules! mirror_enum {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(EarningSourceType <=> DomainSourceType { Tip, Superchat, SubscriptionPool });
mirror_enum!(PaymentProvider <=> DomainPaymentProvider { Stripe, Ccbill });
mirror_enum!(PaymentState <=> DomainPaymentState { Pending, Completed, Failed });
mirror_enum!(EarningStatus <=> DomainEarningStatus { Pending, Available, Withdrawn });
mirror_enum!(WithdrawalMethodType <=> DomainMethodKind { BankTransfer, Paypal });
mirror_enum!(WithdrawalStatus <=> DomainWithdrawalStatus { Validated, Processing, Completed, Failed });
