//! Property-based tests for balance aggregation.
//!
//! - Available plus pending equals every outstanding completed earning
//! - Availability is monotonic in `now`
//! - Stats are idempotent over an unchanged snapshot

use chrono::{DateTime, TimeDelta, Utc};
use payout_shared::{Money, UserId};
use proptest::prelude::*;

use super::balance::{available_balance, compute_stats, pending_balance};
use super::types::{Earning, EarningSourceType, EarningStatus, NewEarning, PaymentState};
use crate::hold::{HoldPolicy, is_available_for_withdrawal};

fn base_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-15T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn source_strategy() -> impl Strategy<Value = EarningSourceType> {
    prop_oneof![
        Just(EarningSourceType::Tip),
        Just(EarningSourceType::Superchat),
        Just(EarningSourceType::SubscriptionPool),
    ]
}

fn payment_state_strategy() -> impl Strategy<Value = PaymentState> {
    prop_oneof![
        4 => Just(PaymentState::Completed),
        1 => Just(PaymentState::Pending),
        1 => Just(PaymentState::Failed),
    ]
}

/// Earnings created up to 60 days either side of the base instant.
fn earning_strategy() -> impl Strategy<Value = Earning> {
    (
        0i64..1_000_000,
        -60 * 24 * 60i64..60 * 24 * 60,
        source_strategy(),
        payment_state_strategy(),
        any::<bool>(),
    )
        .prop_map(|(net, offset_minutes, source, state, withdrawn)| {
            let mut earning = Earning::accrue(
                NewEarning {
                    user_id: UserId::new(),
                    source_type: source,
                    source_id: None,
                    gross_amount: Money::new(net),
                    platform_fee: Money::ZERO,
                    payment_provider: None,
                    payment_state: state,
                },
                base_instant() + TimeDelta::minutes(offset_minutes),
                &HoldPolicy::default(),
            )
            .unwrap();
            if withdrawn {
                earning.status = EarningStatus::Withdrawn;
            }
            earning
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Available + pending covers every completed, unwithdrawn earning exactly once.
    #[test]
    fn prop_available_plus_pending_is_outstanding_total(
        earnings in prop::collection::vec(earning_strategy(), 0..40),
        now_offset in -90i64..90,
    ) {
        let now = base_instant() + TimeDelta::days(now_offset);
        let available = available_balance(&earnings, now).unwrap();
        let pending = pending_balance(&earnings, now).unwrap();

        let outstanding: i64 = earnings
            .iter()
            .filter(|e| e.payment_state == PaymentState::Completed && e.status != EarningStatus::Withdrawn)
            .map(|e| e.net_amount.minor_units())
            .sum();

        prop_assert_eq!(available.checked_add(pending), Some(Money::new(outstanding)));
    }

    /// Once available, always available.
    #[test]
    fn prop_availability_is_monotonic(
        created_offset in -1_000_000i64..1_000_000,
        now_offset in -2_000_000i64..2_000_000,
        later in 0i64..2_000_000,
    ) {
        let created = base_instant() + TimeDelta::minutes(created_offset);
        let now = base_instant() + TimeDelta::minutes(now_offset);
        if is_available_for_withdrawal(created, now) {
            prop_assert!(is_available_for_withdrawal(created, now + TimeDelta::minutes(later)));
        }
    }

    /// Available balance never decreases as time passes over a fixed snapshot.
    #[test]
    fn prop_available_balance_grows_with_time(
        earnings in prop::collection::vec(earning_strategy(), 0..30),
        step_days in 0i64..30,
    ) {
        let now = base_instant();
        let before = available_balance(&earnings, now).unwrap();
        let after = available_balance(&earnings, now + TimeDelta::days(step_days)).unwrap();
        prop_assert!(after >= before);
    }

    /// Stats over an unchanged snapshot are identical.
    #[test]
    fn prop_stats_are_idempotent(
        earnings in prop::collection::vec(earning_strategy(), 0..30),
    ) {
        let hold = HoldPolicy::default();
        let first = compute_stats(&earnings, base_instant(), &hold).unwrap();
        let second = compute_stats(&earnings, base_instant(), &hold).unwrap();
        prop_assert_eq!(first, second);
    }
}
