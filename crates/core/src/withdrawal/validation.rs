//! Withdrawal amount and method validation.

use payout_shared::Money;
use serde_json::Value;
use validator::ValidateEmail;

use super::error::MethodError;
use super::sanitize::sanitize_text;
use super::types::{BankAccountType, WithdrawalMethod, WithdrawalMethodInput, WithdrawalMethodKind};
use crate::error::LedgerError;

/// Payout floor in minor units.
pub const MINIMUM_WITHDRAWAL: Money = Money::new(1000);

/// Validates a requested amount against the default floor and the available balance.
///
/// Checks, in order: positive amount and non-negative balance, the
/// [`MINIMUM_WITHDRAWAL`] floor, then the balance. Both boundaries succeed.
pub fn validate_withdrawal_amount(amount: i64, available: i64) -> Result<(), LedgerError> {
    validate_amount_with_minimum(
        Money::new(amount),
        Money::new(available),
        MINIMUM_WITHDRAWAL,
    )
}

/// Same as [`validate_withdrawal_amount`] with a configurable floor.
pub fn validate_amount_with_minimum(
    amount: Money,
    available: Money,
    minimum: Money,
) -> Result<(), LedgerError> {
    if !amount.is_positive() || available.is_negative() {
        return Err(LedgerError::InvalidAmount);
    }
    if amount < minimum {
        return Err(LedgerError::BelowMinimum { amount, minimum });
    }
    if amount > available {
        return Err(LedgerError::InsufficientBalance {
            requested: amount,
            available,
        });
    }
    Ok(())
}

/// Parses an untyped amount into minor units.
///
/// Only whole, positive JSON integers are accepted. Null, strings, booleans,
/// fractions, zero and negatives are `InvalidAmount`.
pub fn parse_amount(raw: &Value) -> Result<Money, LedgerError> {
    raw.as_i64()
        .filter(|n| *n > 0)
        .map(Money::new)
        .ok_or(LedgerError::InvalidAmount)
}

/// Validates untyped amount and balance values.
///
/// A balance that is not a whole, non-negative integer is `InvalidAmount`.
pub fn validate_withdrawal_amount_raw(amount: &Value, available: &Value) -> Result<Money, LedgerError> {
    let amount = parse_amount(amount)?;
    let available = available
        .as_i64()
        .filter(|n| *n >= 0)
        .ok_or(LedgerError::InvalidAmount)?;
    validate_withdrawal_amount(amount.minor_units(), available)?;
    Ok(amount)
}

/// Validates and sanitizes a withdrawal method payload.
pub fn validate_withdrawal_method(
    method: Option<&WithdrawalMethodInput>,
) -> Result<WithdrawalMethod, LedgerError> {
    let Some(method) = method else {
        return Err(MethodError::InvalidMethodType("withdrawal method is required".to_string()).into());
    };

    let raw_type = method
        .method_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MethodError::InvalidMethodType("type required".to_string()))?;

    let kind: WithdrawalMethodKind = raw_type
        .parse()
        .map_err(|_| MethodError::InvalidMethodType(raw_type.to_string()))?;

    let validated = match kind {
        WithdrawalMethodKind::BankTransfer => validate_bank_transfer(method)?,
        WithdrawalMethodKind::Paypal => validate_paypal(method)?,
    };
    Ok(validated)
}

fn validate_bank_transfer(method: &WithdrawalMethodInput) -> Result<WithdrawalMethod, MethodError> {
    let bank_name = sanitized(method.bank_name.as_deref()).ok_or(MethodError::BankNameRequired)?;

    let account_number = method
        .account_number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(MethodError::AccountNumberRequired)?;
    if !account_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(MethodError::InvalidAccountNumberFormat);
    }

    let account_holder =
        sanitized(method.account_holder.as_deref()).ok_or(MethodError::AccountHolderRequired)?;

    let account_type = method
        .account_type
        .as_deref()
        .and_then(BankAccountType::parse)
        .ok_or(MethodError::InvalidAccountType)?;

    Ok(WithdrawalMethod::BankTransfer {
        bank_name,
        account_number: account_number.to_string(),
        account_holder,
        account_type,
    })
}

fn validate_paypal(method: &WithdrawalMethodInput) -> Result<WithdrawalMethod, MethodError> {
    let email = method
        .paypal_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(MethodError::EmailRequired)?;

    if !email.validate_email() {
        return Err(MethodError::InvalidEmailFormat);
    }

    Ok(WithdrawalMethod::Paypal {
        paypal_email: email.to_string(),
    })
}

/// Sanitized value, or `None` when nothing is left.
fn sanitized(raw: Option<&str>) -> Option<String> {
    raw.map(sanitize_text).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn bank_input() -> WithdrawalMethodInput {
        WithdrawalMethodInput {
            method_type: Some("bank_transfer".to_string()),
            bank_name: Some("Mizuho Bank".to_string()),
            account_number: Some("1234567".to_string()),
            account_holder: Some("Taro Yamada".to_string()),
            account_type: Some("checking".to_string()),
            paypal_email: None,
        }
    }

    fn paypal_input(email: &str) -> WithdrawalMethodInput {
        WithdrawalMethodInput {
            method_type: Some("paypal".to_string()),
            paypal_email: Some(email.to_string()),
            ..WithdrawalMethodInput::default()
        }
    }

    // ========== Amount ==========

    #[rstest]
    #[case(1000, 10_000)]
    #[case(10_000, 10_000)]
    #[case(5000, 10_000)]
    fn test_amount_accepted(#[case] amount: i64, #[case] available: i64) {
        assert_eq!(validate_withdrawal_amount(amount, available), Ok(()));
    }

    #[test]
    fn test_amount_below_minimum() {
        assert_eq!(
            validate_withdrawal_amount(999, 10_000),
            Err(LedgerError::BelowMinimum {
                amount: Money::new(999),
                minimum: Money::new(1000),
            })
        );
    }

    #[test]
    fn test_amount_exceeds_balance() {
        assert_eq!(
            validate_withdrawal_amount(10_001, 10_000),
            Err(LedgerError::InsufficientBalance {
                requested: Money::new(10_001),
                available: Money::new(10_000),
            })
        );
    }

    #[rstest]
    #[case(0, 10_000)]
    #[case(-5, 10_000)]
    #[case(1000, -1)]
    fn test_amount_invalid(#[case] amount: i64, #[case] available: i64) {
        assert_eq!(
            validate_withdrawal_amount(amount, available),
            Err(LedgerError::InvalidAmount)
        );
    }

    #[test]
    fn test_configured_minimum() {
        assert_eq!(
            validate_amount_with_minimum(Money::new(1500), Money::new(10_000), Money::new(2000)),
            Err(LedgerError::BelowMinimum {
                amount: Money::new(1500),
                minimum: Money::new(2000),
            })
        );
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("1000"))]
    #[case(json!(1000.5))]
    #[case(json!(0))]
    #[case(json!(-1000))]
    #[case(json!(true))]
    #[case(json!({"amount": 1000}))]
    fn test_parse_amount_rejects(#[case] raw: Value) {
        assert_eq!(parse_amount(&raw), Err(LedgerError::InvalidAmount));
    }

    #[test]
    fn test_parse_amount_accepts_integer() {
        assert_eq!(parse_amount(&json!(2500)), Ok(Money::new(2500)));
    }

    #[test]
    fn test_raw_validation_rejects_null_balance() {
        assert_eq!(
            validate_withdrawal_amount_raw(&json!(1000), &json!(null)),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            validate_withdrawal_amount_raw(&json!(1000), &json!(10_000)),
            Ok(Money::new(1000))
        );
    }

    // ========== Method ==========

    #[test]
    fn test_bank_transfer_round_trips_plain_input() {
        let method = validate_withdrawal_method(Some(&bank_input())).unwrap();
        assert_eq!(
            method,
            WithdrawalMethod::BankTransfer {
                bank_name: "Mizuho Bank".to_string(),
                account_number: "1234567".to_string(),
                account_holder: "Taro Yamada".to_string(),
                account_type: BankAccountType::Checking,
            }
        );
    }

    #[test]
    fn test_bank_transfer_sanitizes_free_text() {
        let input = WithdrawalMethodInput {
            bank_name: Some("<b>Mizuho</b> Bank ".to_string()),
            account_holder: Some("Taro<script>x</script> Yamada".to_string()),
            ..bank_input()
        };
        let WithdrawalMethod::BankTransfer {
            bank_name,
            account_holder,
            ..
        } = validate_withdrawal_method(Some(&input)).unwrap()
        else {
            panic!("expected bank transfer");
        };
        assert_eq!(bank_name, "Mizuho Bank");
        assert_eq!(account_holder, "Tarox Yamada");
    }

    #[rstest]
    #[case(WithdrawalMethodInput { bank_name: None, ..bank_input() }, MethodError::BankNameRequired)]
    #[case(WithdrawalMethodInput { bank_name: Some("<i></i>".into()), ..bank_input() }, MethodError::BankNameRequired)]
    #[case(WithdrawalMethodInput { account_number: None, ..bank_input() }, MethodError::AccountNumberRequired)]
    #[case(WithdrawalMethodInput { account_number: Some("12-34".into()), ..bank_input() }, MethodError::InvalidAccountNumberFormat)]
    #[case(WithdrawalMethodInput { account_holder: Some("  ".into()), ..bank_input() }, MethodError::AccountHolderRequired)]
    #[case(WithdrawalMethodInput { account_type: Some("brokerage".into()), ..bank_input() }, MethodError::InvalidAccountType)]
    #[case(WithdrawalMethodInput { account_type: None, ..bank_input() }, MethodError::InvalidAccountType)]
    fn test_bank_transfer_field_errors(
        #[case] input: WithdrawalMethodInput,
        #[case] expected: MethodError,
    ) {
        assert_eq!(
            validate_withdrawal_method(Some(&input)),
            Err(LedgerError::Method(expected))
        );
    }

    #[test]
    fn test_paypal_accepted() {
        assert_eq!(
            validate_withdrawal_method(Some(&paypal_input(" creator@example.com "))),
            Ok(WithdrawalMethod::Paypal {
                paypal_email: "creator@example.com".to_string(),
            })
        );
    }

    #[rstest]
    #[case("", MethodError::EmailRequired)]
    #[case("not-an-email", MethodError::InvalidEmailFormat)]
    #[case("creator@", MethodError::InvalidEmailFormat)]
    #[case("@example.com", MethodError::InvalidEmailFormat)]
    fn test_paypal_errors(#[case] email: &str, #[case] expected: MethodError) {
        assert_eq!(
            validate_withdrawal_method(Some(&paypal_input(email))),
            Err(LedgerError::Method(expected))
        );
    }

    #[test]
    fn test_missing_method() {
        assert_eq!(
            validate_withdrawal_method(None),
            Err(LedgerError::Method(MethodError::InvalidMethodType(
                "withdrawal method is required".to_string()
            )))
        );
    }

    #[test]
    fn test_empty_method_reports_type_required() {
        assert_eq!(
            validate_withdrawal_method(Some(&WithdrawalMethodInput::default())),
            Err(LedgerError::Method(MethodError::InvalidMethodType(
                "type required".to_string()
            )))
        );
    }

    #[test]
    fn test_unknown_method_type() {
        let input = WithdrawalMethodInput {
            method_type: Some("crypto".to_string()),
            ..WithdrawalMethodInput::default()
        };
        assert_eq!(
            validate_withdrawal_method(Some(&input)),
            Err(LedgerError::Method(MethodError::InvalidMethodType(
                "crypto".to_string()
            )))
        );
    }
}
