//! Property-based tests for amount validation, fees and method round-trips.

use payout_shared::Money;
use proptest::prelude::*;

use super::error::MethodError;
use super::fee::calculate_withdrawal_fee;
use super::types::{BankAccountType, WithdrawalMethod, WithdrawalMethodInput};
use super::validation::{MINIMUM_WITHDRAWAL, validate_withdrawal_amount, validate_withdrawal_method};
use crate::error::LedgerError;

/// Markup-free text with no leading or trailing whitespace.
fn plain_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .,'&-]{0,30}[A-Za-z]"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any amount in [minimum, available] is accepted.
    #[test]
    fn prop_amount_within_bounds_accepted(
        available in 1000i64..10_000_000,
        fraction in 0u32..=100,
    ) {
        let span = available - 1000;
        let amount = 1000 + span * i64::from(fraction) / 100;
        prop_assert_eq!(validate_withdrawal_amount(amount, available), Ok(()));
    }

    /// Anything under the floor is rejected as below minimum.
    #[test]
    fn prop_amount_below_minimum(amount in 1i64..1000, available in 0i64..10_000_000) {
        prop_assert_eq!(
            validate_withdrawal_amount(amount, available),
            Err(LedgerError::BelowMinimum {
                amount: Money::new(amount),
                minimum: MINIMUM_WITHDRAWAL,
            })
        );
    }

    /// Anything above the balance (and above the floor) is insufficient.
    #[test]
    fn prop_amount_above_balance(available in 0i64..10_000_000, excess in 1i64..1_000_000) {
        let amount = available.max(999) + excess;
        prop_assert_eq!(
            validate_withdrawal_amount(amount, available),
            Err(LedgerError::InsufficientBalance {
                requested: Money::new(amount),
                available: Money::new(available),
            })
        );
    }

    /// Non-positive amounts are invalid regardless of balance.
    #[test]
    fn prop_non_positive_amount_invalid(amount in i64::MIN..=0, available in 0i64..10_000_000) {
        prop_assert_eq!(
            validate_withdrawal_amount(amount, available),
            Err(LedgerError::InvalidAmount)
        );
    }

    /// Flat fees for every non-negative amount.
    #[test]
    fn prop_fees_are_flat(amount in 0i64..i64::MAX) {
        prop_assert_eq!(calculate_withdrawal_fee(amount, "bank_transfer"), Ok(Money::new(250)));
        prop_assert_eq!(calculate_withdrawal_fee(amount, "paypal"), Ok(Money::ZERO));
    }

    /// Plain bank payloads come back unchanged.
    #[test]
    fn prop_bank_method_round_trips(
        bank_name in plain_text(),
        account_holder in plain_text(),
        account_number in "[0-9]{4,17}",
        savings in any::<bool>(),
    ) {
        let input = WithdrawalMethodInput {
            method_type: Some("bank_transfer".to_string()),
            bank_name: Some(bank_name.clone()),
            account_number: Some(account_number.clone()),
            account_holder: Some(account_holder.clone()),
            account_type: Some(if savings { "savings" } else { "checking" }.to_string()),
            paypal_email: None,
        };
        let expected = WithdrawalMethod::BankTransfer {
            bank_name,
            account_number,
            account_holder,
            account_type: if savings { BankAccountType::Savings } else { BankAccountType::Checking },
        };
        prop_assert_eq!(validate_withdrawal_method(Some(&input)), Ok(expected));
    }

    /// Any non-digit in the account number is rejected.
    #[test]
    fn prop_account_number_digits_only(prefix in "[0-9]{1,8}", bad in "[a-zA-Z -]", suffix in "[0-9]{1,8}") {
        let input = WithdrawalMethodInput {
            method_type: Some("bank_transfer".to_string()),
            bank_name: Some("Bank".to_string()),
            account_number: Some(format!("{prefix}{bad}{suffix}")),
            account_holder: Some("Holder".to_string()),
            account_type: Some("checking".to_string()),
            paypal_email: None,
        };
        prop_assert_eq!(
            validate_withdrawal_method(Some(&input)),
            Err(LedgerError::Method(MethodError::InvalidAccountNumberFormat))
        );
    }
}
