use std::collections::BTreeSet;

use belief_core::constants::weekday_list;
use belief_core::models::{DetectedPattern, PatternMetadata, PatternType};
use belief_core::Event;
use chrono::Datelike;

use super::{bounds, DetectionInput};
use crate::grouping;

/// Occurrences concentrate on particular weekdays.
///
/// A weekday is over-represented when its count reaches `temporal_min_lift`
/// times the uniform share (`n / 7`) and holds at least `min_occurrences`
/// occurrences itself. All such weekdays of a group form one pattern.
pub fn detect(input: &DetectionInput<'_>) -> Vec<DetectedPattern> {
    let config = input.config;
    let mut patterns = Vec::new();

    for (&(action, target), events) in &input.current {
        if events.len() < config.temporal_min_occurrences {
            continue;
        }
        let weeks: BTreeSet<(i32, u32)> = events
            .iter()
            .map(|e| {
                let w = e.timestamp.iso_week();
                (w.year(), w.week())
            })
            .collect();
        let weeks_observed = weeks.len() as u32;
        if weeks_observed < config.temporal_min_weeks {
            continue;
        }

        let mut counts = [0usize; 7];
        for e in events {
            counts[weekday(e) as usize] += 1;
        }
        let n = events.len() as f64;
        let uniform = n / 7.0;
        let weekdays: Vec<u32> = (0..7u32)
            .filter(|&d| {
                let c = counts[d as usize];
                c >= config.min_occurrences && c as f64 >= config.temporal_min_lift * uniform
            })
            .collect();
        if weekdays.is_empty() {
            continue;
        }

        let on_days: Vec<&Event> = events
            .iter()
            .filter(|e| weekdays.contains(&weekday(e)))
            .copied()
            .collect();
        let share = on_days.len() as f64 / n;
        let expected_share = weekdays.len() as f64 / 7.0;
        let Some((first, last)) = bounds(&on_days) else {
            continue;
        };
        let names = weekday_list(&weekdays);

        patterns.push(DetectedPattern {
            id: DetectedPattern::derive_id(
                input.user_id,
                PatternType::Temporal,
                action,
                target,
                &names,
                &input.window,
            ),
            pattern_type: PatternType::Temporal,
            user_id: input.user_id.to_string(),
            action: action.to_string(),
            target: target.to_string(),
            description: format!(
                "Weekly pattern: {action} {target} on {names} ({:.0}% of occurrences)",
                share * 100.0
            ),
            evidence: grouping::ids(&on_days),
            consistency: share,
            first_seen: first,
            last_seen: last,
            metadata: PatternMetadata::Temporal {
                weekdays,
                share,
                expected_share,
                weeks_observed,
            },
        });
    }
    patterns
}

fn weekday(event: &Event) -> u32 {
    event.timestamp.weekday().num_days_from_monday()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::in_window;
    use belief_core::config::DetectionConfig;
    use belief_core::TimeRange;
    use chrono::Duration;
    use test_fixtures::{daily_events, events_on_weekdays, ts};

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
    fn monday_thursday_routine_is_detected() {
        let start = ts("2026-01-05T07:00:00Z");
        let events = events_on_weekdays("u1", "go", "gym", start, 28, &[0, 3]);
        let window = TimeRange::new(start - Duration::days(1), start + Duration::days(28));
        let patterns = run(&events, window);
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert!(p.description.contains("Mon, Thu"));
        match &p.metadata {
            PatternMetadata::Temporal { weekdays, share, weeks_observed, .. } => {
                assert_eq!(weekdays, &vec![0, 3]);
                assert_eq!(*share, 1.0);
                assert_eq!(*weeks_observed, 4);
            }
            _ => panic!("wrong metadata"),
        }
    }

    #[test]
    fn uniform_daily_activity_has_no_weekday_bias() {
        let start = ts("2026-01-05T07:00:00Z");
        let events = daily_events("u1", "brush", "teeth", start, 28);
        let window = TimeRange::new(start, start + Duration::days(28));
        assert!(run(&events, window).is_empty());
    }

    #[test]
    fn single_week_is_not_a_routine() {
        let start = ts("2026-01-05T07:00:00Z");
        let mut events = events_on_weekdays("u1", "go", "pool", start, 7, &[0]);
        for i in 1..4 {
            let mut e = events[0].clone();
            e.id = format!("extra{i}");
            e.timestamp = e.timestamp + Duration::hours(i);
            events.push(e);
        }
        let window = TimeRange::new(start, start + Duration::days(7));
        assert!(run(&events, window).is_empty());
    }
}
