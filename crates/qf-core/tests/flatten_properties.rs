//! Randomized checks of the flattening against a day-by-day brute force.
//!
//! For every generated set of versions the flattened timeline must be
//! ordered, non-overlapping, cover exactly the days the input covers, and
//! assign each day to the highest-priority version covering it. Same-tier
//! overlaps must be reported, and nothing else may fail. Versions ending
//! before they start cover no day and must not affect the result.

use chrono::{Days, NaiveDate, TimeDelta};
use proptest::prelude::*;

use qf_core::{
    FlattenError, KeyValueRecord, Priority, Quay, Validity, Value, VersionedInterval,
    extract_validity, flatten_timeline,
};

/// Past the last possible closed end, so open-ended versions are checked too.
const HORIZON_DAYS: u64 = 100;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(n: u64) -> NaiveDate {
    base().checked_add_days(Days::new(n)).unwrap()
}

/// Versions starting between day 5 and day 64. Some closed versions end
/// before they start and so cover no day at all.
fn version() -> impl Strategy<Value = Validity> {
    (
        5u64..65,
        proptest::option::weighted(0.8, -5i64..30),
        10i32..14,
    )
        .prop_map(|(start, length, priority)| {
            let start = day(start);
            Validity::new(
                start,
                length.map(|length| start + TimeDelta::days(length)),
                Priority::new(priority),
            )
        })
}

/// Back-to-back versions of one priority with random gaps between them.
fn flat_tier() -> impl Strategy<Value = Vec<Validity>> {
    prop::collection::vec((0u64..5, 0u64..10), 0..8).prop_map(|steps| {
        let mut next_start = 0;
        steps
            .into_iter()
            .map(|(gap, length)| {
                let start = next_start + gap;
                next_start = start + length + 1;
                Validity::closed(day(start), day(start + length), Priority::new(10))
            })
            .collect()
    })
}

fn has_same_tier_conflict(versions: &[VersionedInterval<usize>]) -> bool {
    let valid: Vec<_> = versions.iter().filter(|v| v.validity.is_valid()).collect();
    valid.iter().enumerate().any(|(i, a)| {
        valid[i + 1..]
            .iter()
            .any(|b| a.validity.conflicts_with(&b.validity))
    })
}

fn quay_with_range(start: NaiveDate, end: Option<NaiveDate>) -> Quay {
    let mut quay = Quay::default();
    quay.key_values
        .insert("validityStart".to_string(), Value::new(start.to_string()));
    quay.key_values.insert("priority".to_string(), Value::new("10"));
    if let Some(end) = end {
        quay.key_values
            .insert("validityEnd".to_string(), Value::new(end.to_string()));
    }
    quay
}

proptest! {
    #[test]
    fn prop_every_day_goes_to_highest_priority(raw in prop::collection::vec(version(), 0..8)) {
        let versions: Vec<_> = raw
            .into_iter()
            .enumerate()
            .map(|(owner, validity)| VersionedInterval::new(validity, owner))
            .collect();
        let conflicting = has_same_tier_conflict(&versions);

        match flatten_timeline("H1", versions.clone()) {
            Err(FlattenError::ConflictingSameTierVersions { .. }) => prop_assert!(conflicting),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
            Ok(timeline) => {
                prop_assert!(!conflicting);

                for interval in &timeline {
                    prop_assert!(interval.validity.is_valid());
                }
                for pair in timeline.windows(2) {
                    let end = pair[0].validity.end();
                    prop_assert!(end.is_some(), "open-ended version must be last");
                    prop_assert!(end < Some(pair[1].validity.start()));
                }

                for n in 0..HORIZON_DAYS {
                    let date = day(n);
                    let expected = versions
                        .iter()
                        .filter(|v| v.validity.contains(date))
                        .max_by_key(|v| v.validity.priority());
                    let covering: Vec<_> = timeline
                        .iter()
                        .filter(|v| v.validity.contains(date))
                        .collect();

                    prop_assert!(covering.len() <= 1, "{date} covered {} times", covering.len());
                    prop_assert_eq!(covering.first().map(|v| v.owner), expected.map(|v| v.owner));
                    prop_assert_eq!(
                        covering.first().map(|v| v.validity.priority()),
                        expected.map(|v| v.validity.priority())
                    );
                }
            }
        }
    }

    #[test]
    fn prop_extraction_accepts_exactly_forward_ranges(
        start in 0u64..60,
        end in proptest::option::of(0u64..60),
    ) {
        let (start, end) = (day(start), end.map(day));
        let quay = quay_with_range(start, end);

        match extract_validity(&quay) {
            Ok(validity) => {
                prop_assert!(end.is_none_or(|end| start <= end));
                prop_assert!(validity.is_valid());
                prop_assert_eq!(validity.end(), end);
            }
            Err(FlattenError::InvertedValidityRange { record, .. }) => {
                prop_assert!(end.is_some_and(|end| end < start));
                prop_assert_eq!(record, quay.record_label());
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn prop_flat_timeline_is_unchanged(tier in flat_tier()) {
        let versions: Vec<_> = tier
            .into_iter()
            .enumerate()
            .map(|(owner, validity)| VersionedInterval::new(validity, owner))
            .collect();

        let timeline = flatten_timeline("H1", versions.clone()).unwrap();

        prop_assert_eq!(timeline, versions);
    }
}
