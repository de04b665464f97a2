use std::collections::BTreeSet;

use belief_core::models::{DetectedPattern, PatternMetadata, PatternType};
use belief_core::Event;

use super::{bounds, DetectionInput};
use crate::grouping;

/// The window's daily rate deviates from the trailing baseline's daily rate.
///
/// Covers both directions, including a behaviour that stopped entirely
/// (active baseline, silent window). Baselines sparser than
/// `min_baseline_per_day` are too thin to deviate from and are skipped.
pub fn detect(input: &DetectionInput<'_>) -> Vec<DetectedPattern> {
    let config = input.config;
    let baseline_days = input.baseline.days().max(1.0);
    let window_days = input.window.days().max(1.0);
    let keys: BTreeSet<(&str, &str)> = input
        .previous
        .keys()
        .chain(input.current.keys())
        .copied()
        .collect();

    let mut patterns = Vec::new();
    for (action, target) in keys {
        let before: &[&Event] = input
            .previous
            .get(&(action, target))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let now: &[&Event] = input
            .current
            .get(&(action, target))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let expected = before.len() as f64 / baseline_days;
        if expected < config.min_baseline_per_day {
            continue;
        }
        let actual = now.len() as f64 / window_days;
        let deviation = (actual - expected) / expected;
        if deviation.abs() < config.min_anomaly_deviation {
            continue;
        }

        let (label, wording) = if now.is_empty() {
            ("stopped", "stopped".to_string())
        } else if deviation > 0.0 {
            ("higher", format!("{:.0}% higher than", deviation * 100.0))
        } else {
            ("lower", format!("{:.0}% lower than", deviation.abs() * 100.0))
        };

        let evidence: Vec<&Event> = before.iter().chain(now.iter()).copied().collect();
        let Some((first, last)) = bounds(&evidence) else {
            continue;
        };
        let description = if now.is_empty() {
            format!("Anomaly: {action} {target} stopped (was {expected:.2}/day, now 0/day)")
        } else {
            format!("Anomaly: {action} {target} is {wording} expected ({actual:.2}/day vs {expected:.2}/day)")
        };

        patterns.push(DetectedPattern {
            id: DetectedPattern::derive_id(
                input.user_id,
                PatternType::Anomaly,
                action,
                target,
                label,
                &input.window,
            ),
            pattern_type: PatternType::Anomaly,
            user_id: input.user_id.to_string(),
            action: action.to_string(),
            target: target.to_string(),
            description,
            evidence: grouping::ids(&evidence),
            consistency: deviation.abs().min(1.0),
            first_seen: first,
            last_seen: last,
            metadata: PatternMetadata::Anomaly {
                expected_per_day: expected,
                actual_per_day: actual,
                deviation_ratio: deviation,
                baseline_days: input.baseline.days().round() as i64,
            },
        });
    }
    patterns
}
