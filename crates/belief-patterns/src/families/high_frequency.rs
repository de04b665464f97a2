use belief_core::models::{DetectedPattern, PatternMetadata, PatternType};

use super::{bounds, DetectionInput};
use crate::consistency;
use crate::grouping;

/// Repeated action on the same target.
///
/// The rate is measured from the first occurrence to the end of the window
/// (floored at one day), so a habit picked up mid-window is not diluted by the
/// days before it started.
pub fn detect(input: &DetectionInput<'_>) -> Vec<DetectedPattern> {
    let config = input.config;
    let mut patterns = Vec::new();

    for (&(action, target), events) in &input.current {
        if events.len() < config.min_occurrences {
            continue;
        }
        let Some((first, last)) = bounds(events) else {
            continue;
        };
        let observed_days =
            ((input.window.end - first).num_seconds() as f64 / 86_400.0).max(1.0);
        let per_day = events.len() as f64 / observed_days;
        if per_day < config.min_frequency_per_day {
            continue;
        }
        let regularity = consistency::regularity(events);
        if regularity < config.min_consistency {
            continue;
        }

        patterns.push(DetectedPattern {
            id: DetectedPattern::derive_id(
                input.user_id,
                PatternType::HighFrequency,
                action,
                target,
                "",
                &input.window,
            ),
            pattern_type: PatternType::HighFrequency,
            user_id: input.user_id.to_string(),
            action: action.to_string(),
            target: target.to_string(),
            description: format!("Frequently {action} {target} ({per_day:.2} times/day)"),
            evidence: grouping::ids(events),
            consistency: regularity,
            first_seen: first,
            last_seen: last,
            metadata: PatternMetadata::HighFrequency {
                occurrences_per_day: per_day,
            },
        });
    }
    patterns
}
