use belief_core::models::{DetectedPattern, PatternMetadata, PatternType, TrendDirection};

use super::{bounds, DetectionInput};
use crate::grouping;

/// Rising or falling volume between the two equal halves of the window.
///
/// Volume is summed quantity when every event in the group carries one,
/// otherwise the occurrence count. A group absent from the first half has no
/// baseline to change from and is left to the anomaly family.
pub fn detect(input: &DetectionInput<'_>) -> Vec<DetectedPattern> {
    let config = input.config;
    let mut patterns = Vec::new();
    if input.window.days() < config.min_trend_window_days as f64 {
        return patterns;
    }
    let (first_half, _) = input.window.halves();
    let mid = first_half.end;

    for (&(action, target), events) in &input.current {
        if events.len() < config.min_occurrences {
            continue;
        }
        let by_quantity = events.iter().all(|e| e.quantity.is_some());
        let volume = |in_first: bool| -> f64 {
            events
                .iter()
                .filter(|e| (e.timestamp < mid) == in_first)
                .map(|e| if by_quantity { e.quantity.unwrap_or(0.0) } else { 1.0 })
                .sum()
        };
        let before = volume(true);
        let after = volume(false);
        if before <= 0.0 {
            continue;
        }
        let change = (after - before) / before;
        if change.abs() < config.min_trend_change {
            continue;
        }
        let direction = if change > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };
        let Some((first, last)) = bounds(events) else {
            continue;
        };
        let direction_str = match direction {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
        };

        patterns.push(DetectedPattern {
            id: DetectedPattern::derive_id(
                input.user_id,
                PatternType::Trend,
                action,
                target,
                direction_str,
                &input.window,
            ),
            pattern_type: PatternType::Trend,
            user_id: input.user_id.to_string(),
            action: action.to_string(),
            target: target.to_string(),
            description: format!(
                "{action} {target} is {direction_str} ({:.0}% change)",
                change.abs() * 100.0
            ),
            evidence: grouping::ids(events),
            consistency: change.abs().min(1.0),
            first_seen: first,
            last_seen: last,
            metadata: PatternMetadata::Trend {
                direction,
                change_ratio: change,
                first_half_value: before,
                second_half_value: after,
                by_quantity,
            },
        });
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::in_window;
    use belief_core::config::DetectionConfig;
    use belief_core::{Event, TimeRange};
    use chrono::{Duration, Utc};
    use test_fixtures::{spaced_events, EventBuilder};

    fn run(events: &[Event], window: TimeRange) -> Vec<DetectedPattern> {
        let config = DetectionConfig::default();
        let input = DetectionInput {
            user_id: "u1",
            window,
            baseline: window.preceding(30),
            current: in_window(events, &window),
            previous: Default::default(),
            config: &config,
        };
        detect(&input)
    }

    #[test]
    fn frequency_doubling_is_increasing() {
        let now = Utc::now();
        let window = TimeRange::last_n_days(now, 20);
        // 2 in the first half, 6 in the second.
        let mut events = spaced_events("u1", "drink", "coffee", window.start + Duration::days(1), 2, 72, "a");
        events.extend(spaced_events("u1", "drink", "coffee", window.start + Duration::days(11), 6, 24, "b"));
        let patterns = run(&events, window);
        assert_eq!(patterns.len(), 1);
        match &patterns[0].metadata {
            PatternMetadata::Trend { direction, change_ratio, by_quantity, .. } => {
                assert_eq!(*direction, TrendDirection::Increasing);
                assert!((change_ratio - 2.0).abs() < 1e-9);
                assert!(!by_quantity);
            }
            _ => panic!("wrong metadata"),
        }
        assert_eq!(patterns[0].consistency, 1.0);
    }

    #[test]
    fn quantities_are_compared_when_present() {
        let now = Utc::now();
        let window = TimeRange::last_n_days(now, 14);
        let events: Vec<Event> = (0..14)
            .map(|d| {
                let q = if d < 7 { 4.0 } else { 1.0 };
                EventBuilder::new(&format!("e{d}"), "u1", window.start + Duration::days(d) + Duration::hours(1))
                    .action("smoke")
                    .target("cigarette")
                    .quantity(q, "pcs")
                    .build()
            })
            .collect();
        let patterns = run(&events, window);
        assert_eq!(patterns.len(), 1);
        match &patterns[0].metadata {
            PatternMetadata::Trend { direction, by_quantity, first_half_value, second_half_value, .. } => {
                assert_eq!(*direction, TrendDirection::Decreasing);
                assert!(by_quantity);
                assert_eq!(*first_half_value, 28.0);
                assert_eq!(*second_half_value, 7.0);
            }
            _ => panic!("wrong metadata"),
        }
    }

    #[test]
    fn short_window_reports_nothing() {
        let now = Utc::now();
        let window = TimeRange::last_n_days(now, 5);
        let mut events = spaced_events("u1", "drink", "coffee", window.start, 1, 24, "a");
        events.extend(spaced_events("u1", "drink", "coffee", window.start + Duration::days(3), 5, 6, "b"));
        assert!(run(&events, window).is_empty());
    }

    #[test]
    fn steady_volume_is_not_a_trend() {
        let now = Utc::now();
        let window = TimeRange::last_n_days(now, 20);
        let events = spaced_events("u1", "read", "book", window.start + Duration::hours(12), 20, 24, "r");
        assert!(run(&events, window).is_empty());
    }
}
