//! `SeaORM` entity definitions for the ledger tables.

pub mod earnings;
pub mod sea_orm_active_enums;
pub mod withdrawal_requests;

pub mod prelude {
    //! Entity aliases.

    pub use super::earnings::Entity as Earnings;
    pub use super::withdrawal_requests::Entity as WithdrawalRequests;
}
