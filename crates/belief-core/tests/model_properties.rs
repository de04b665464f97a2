//! Property tests for the value types every other crate builds on.

use belief_core::{Confidence, TimeRange};
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

proptest! {
    #[test]
    fn confidence_is_always_in_unit_interval(raw in any::<f64>(), factor in any::<f64>()) {
        let c = Confidence::new(raw);
        prop_assert!((0.0..=1.0).contains(&c.value()));
        let scaled = c * factor;
        prop_assert!((0.0..=1.0).contains(&scaled.value()));
    }

    #[test]
    fn promotable_means_strictly_above_threshold(raw in 0.0f64..=1.0) {
        let c = Confidence::new(raw);
        prop_assert_eq!(c.is_promotable(), raw > Confidence::PROMOTION);
    }

    #[test]
    fn halves_partition_the_range(start in 0i64..2_000_000_000, len in 0i64..10_000_000) {
        let range = TimeRange::new(at(start), at(start + len));
        let (first, second) = range.halves();
        prop_assert_eq!(first.start, range.start);
        prop_assert_eq!(first.end, second.start);
        prop_assert_eq!(second.end, range.end);
        prop_assert_eq!(first.duration() + second.duration(), range.duration());
    }

    #[test]
    fn union_covers_both_ranges(
        a in 0i64..2_000_000_000, a_len in 0i64..10_000_000,
        b in 0i64..2_000_000_000, b_len in 0i64..10_000_000,
    ) {
        let x = TimeRange::new(at(a), at(a + a_len));
        let y = TimeRange::new(at(b), at(b + b_len));
        let u = x.union(&y);
        for ts in [x.start, x.end, y.start, y.end] {
            prop_assert!(u.contains(ts));
        }
    }

    #[test]
    fn preceding_window_ends_where_this_one_starts(start in 0i64..2_000_000_000, days in 1i64..400) {
        let range = TimeRange::last_n_days(at(start + 400 * 86_400), 30);
        let before = range.preceding(days);
        prop_assert_eq!(before.end, range.start);
        prop_assert_eq!(before.duration().num_days(), days);
    }
}
