//! Property-based tests for earning reservation.
//!
//! - A plan covers the requested amount exactly with distinct, withdrawable earnings
//! - Requesting the whole available balance consumes every available earning
//! - Planning never reserves more than the live balance

use chrono::{DateTime, TimeDelta, Utc};
use payout_shared::{Money, UserId, WithdrawalId};
use proptest::prelude::*;
use std::collections::HashSet;

use super::state::plan_reservation;
use super::types::{WithdrawalDraft, WithdrawalMethod, WithdrawalQuote};
use crate::earning::{Earning, EarningSourceType, NewEarning, PaymentState, available_balance};
use crate::error::LedgerError;
use crate::hold::HoldPolicy;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-08-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn earnings_strategy(user_id: UserId) -> impl Strategy<Value = Vec<Earning>> {
    prop::collection::vec((1i64..50, 0i64..40), 0..25).prop_map(move |specs| {
        specs
            .into_iter()
            .map(|(hundreds, days_ago)| {
                Earning::accrue(
                    NewEarning {
                        user_id,
                        source_type: EarningSourceType::Superchat,
                        source_id: None,
                        gross_amount: Money::new(hundreds * 100),
                        platform_fee: Money::ZERO,
                        payment_provider: None,
                        payment_state: PaymentState::Completed,
                    },
                    now() - TimeDelta::days(days_ago),
                    &HoldPolicy::default(),
                )
                .unwrap()
            })
            .collect()
    })
}

fn draft(user_id: UserId, amount: Money) -> WithdrawalDraft {
    WithdrawalDraft {
        id: WithdrawalId::new(),
        user_id,
        quote: WithdrawalQuote {
            amount,
            fee: Money::ZERO,
            net_amount: amount,
            method: WithdrawalMethod::Paypal {
                paypal_email: "creator@example.com".to_string(),
            },
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Successful plans cover the amount exactly with distinct withdrawable earnings.
    #[test]
    fn prop_plan_covers_exactly(
        (user_id, earnings) in Just(UserId::new()).prop_flat_map(|u| (Just(u), earnings_strategy(u))),
        hundreds in 10i64..200,
    ) {
        let amount = Money::new(hundreds * 100);
        match plan_reservation(&draft(user_id, amount), &earnings, now()) {
            Ok(request) => {
                let ids: HashSet<_> = request.earning_ids.iter().copied().collect();
                prop_assert_eq!(ids.len(), request.earning_ids.len());

                let selected: Vec<&Earning> =
                    earnings.iter().filter(|e| ids.contains(&e.id)).collect();
                prop_assert_eq!(selected.len(), ids.len());
                prop_assert!(selected.iter().all(|e| e.is_withdrawable(now())));

                let total = Money::checked_sum(selected.iter().map(|e| e.net_amount));
                prop_assert_eq!(total, Some(amount));
            }
            Err(err) => {
                let is_insufficient = matches!(err, LedgerError::InsufficientBalance { .. });
                prop_assert!(is_insufficient);
            }
        }
    }

    /// Withdrawing the whole available balance always succeeds and consumes every available earning.
    #[test]
    fn prop_full_balance_consumes_all(
        (user_id, earnings) in Just(UserId::new()).prop_flat_map(|u| (Just(u), earnings_strategy(u))),
    ) {
        let available = available_balance(&earnings, now()).unwrap();
        prop_assume!(available.is_positive());

        let request = plan_reservation(&draft(user_id, available), &earnings, now()).unwrap();
        let expected = earnings.iter().filter(|e| e.is_withdrawable(now())).count();
        prop_assert_eq!(request.earning_ids.len(), expected);
    }

    /// Amounts above the live balance are always rejected.
    #[test]
    fn prop_never_over_reserves(
        (user_id, earnings) in Just(UserId::new()).prop_flat_map(|u| (Just(u), earnings_strategy(u))),
        excess in 1i64..10_000,
    ) {
        let available = available_balance(&earnings, now()).unwrap();
        let amount = Money::new(available.minor_units() + excess);
        let result = plan_reservation(&draft(user_id, amount), &earnings, now());
        prop_assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance { requested: amount, available })
        );
    }
}
