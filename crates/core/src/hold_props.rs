//! Property tests for hold-period arithmetic.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use proptest::prelude::*;

use crate::hold::{HoldPolicy, calculate_available_date, is_available_for_withdrawal};

/// 2000-01-01T00:00:00Z .. 2100-01-01T00:00:00Z in milliseconds.
const RANGE_MS: std::ops::Range<i64> = 946_684_800_000..4_102_444_800_000;

fn instant(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_utc_hold_is_exactly_fourteen_days(ms in RANGE_MS) {
        let created = instant(ms);
        let available = calculate_available_date(created).unwrap();
        prop_assert_eq!(available - created, TimeDelta::days(14));
        prop_assert_eq!(available.nanosecond(), created.nanosecond());
    }

    #[test]
    fn prop_available_date_is_monotonic(a in RANGE_MS, b in RANGE_MS) {
        let (early, late) = (instant(a.min(b)), instant(a.max(b)));
        prop_assert!(
            calculate_available_date(early).unwrap() <= calculate_available_date(late).unwrap()
        );
    }

    #[test]
    fn prop_availability_flips_once(ms in RANGE_MS, offset_ms in 0i64..(30 * 86_400_000)) {
        let created = instant(ms);
        let now = created + TimeDelta::milliseconds(offset_ms);
        prop_assert_eq!(
            is_available_for_withdrawal(created, now),
            offset_ms >= 14 * 86_400_000
        );
    }

    #[test]
    fn prop_dst_zone_drifts_at_most_one_hour(ms in RANGE_MS) {
        let hold = HoldPolicy::new(14, chrono_tz::Europe::Berlin);
        let created = instant(ms);
        let drift = hold.available_at(created).unwrap() - created - TimeDelta::days(14);
        prop_assert!(drift.num_minutes().abs() <= 60);
    }
}
