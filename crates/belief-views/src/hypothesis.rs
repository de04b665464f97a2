//! Hypothesis sentences for each pattern family.
//!
//! Qualifiers are chosen from the conflict detector's antonym table (often,
//! rarely, habitually, increasing, decreasing) so opposing hypotheses about
//! the same target are recognisable without any language model.

use belief_core::models::{DetectedPattern, PatternMetadata, TrendDirection};

use belief_core::constants::weekday_list;

/// Render the claim a pattern supports.
pub fn render(pattern: &DetectedPattern) -> String {
    let action = pattern.action.trim();
    let target = pattern.target.trim();
    match &pattern.metadata {
        PatternMetadata::HighFrequency { .. } => format!("often {action} {target}"),
        PatternMetadata::Trend { direction, .. } => match direction {
            TrendDirection::Increasing => format!("{action} {target} increasing"),
            TrendDirection::Decreasing => format!("{action} {target} decreasing"),
        },
        PatternMetadata::Anomaly {
            deviation_ratio, actual_per_day, ..
        } => {
            if *actual_per_day == 0.0 {
                format!("rarely {action} {target} anymore")
            } else if *deviation_ratio < 0.0 {
                format!("rarely {action} {target} lately")
            } else {
                format!("{action} {target} more than usual")
            }
        }
        PatternMetadata::Temporal { weekdays, .. } => {
            format!("habitually {action} {target} on {}", weekday_list(weekdays))
        }
    }
}
