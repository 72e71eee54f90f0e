//! Withdrawal validation, fees and lifecycle.

pub mod error;
pub mod fee;
pub mod sanitize;
pub mod state;
pub mod types;
pub mod validation;

#[cfg(test)]
mod state_props;

#[cfg(test)]
mod validation_props;

pub use error::MethodError;
pub use fee::{FeeSchedule, calculate_withdrawal_fee};
pub use sanitize::sanitize_text;
pub use state::{Reservation, WithdrawalStateMachine, complete, fail, plan_reservation, settle};
pub use types::{
    BankAccountType, WithdrawalDraft, WithdrawalMethod, WithdrawalMethodInput,
    WithdrawalMethodKind, WithdrawalQuote, WithdrawalRequest, WithdrawalStatus,
};
pub use validation::{
    MINIMUM_WITHDRAWAL, parse_amount, validate_amount_with_minimum, validate_withdrawal_amount,
    validate_withdrawal_amount_raw, validate_withdrawal_method,
};
