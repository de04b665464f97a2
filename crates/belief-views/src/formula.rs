use belief_core::config::ViewConfig;
use belief_core::models::PatternType;
use belief_core::Confidence;

use crate::factors;

/// 3-factor multiplicative confidence formula.
///
/// ```text
/// confidence = base_multiplier[pattern_type]
///   × evidence_bonus(n)
///   × timespan_bonus(days)
/// ```
///
/// Result is clamped to [0.0, 1.0].
pub fn compute(
    pattern_type: PatternType,
    evidence_count: usize,
    span_days: f64,
    config: &ViewConfig,
) -> Confidence {
    compute_breakdown(pattern_type, evidence_count, span_days, config).final_confidence
}

/// Each factor individually, for debugging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBreakdown {
    pub base_multiplier: f64,
    pub evidence_bonus: f64,
    pub timespan_bonus: f64,
    pub final_confidence: Confidence,
}

pub fn compute_breakdown(
    pattern_type: PatternType,
    evidence_count: usize,
    span_days: f64,
    config: &ViewConfig,
) -> ConfidenceBreakdown {
    let base_multiplier = config.multiplier(pattern_type);
    let evidence_bonus = factors::evidence::calculate(evidence_count);
    let timespan_bonus = factors::timespan::calculate(span_days, config.timespan_reference_days);

    ConfidenceBreakdown {
        base_multiplier,
        evidence_bonus,
        timespan_bonus,
        final_confidence: Confidence::new(base_multiplier * evidence_bonus * timespan_bonus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_events_over_ten_days_habit() {
        let b = compute_breakdown(PatternType::HighFrequency, 5, 10.0, &ViewConfig::default());
        assert_eq!(b.base_multiplier, 1.0);
        assert!((b.final_confidence.value() - 0.877_44).abs() < 1e-4);
    }

    #[test]
    fn multipliers_follow_pattern_type() {
        let config = ViewConfig::default();
        let at = |t| compute(t, 1, 30.0, &config).value();
        assert_eq!(at(PatternType::HighFrequency), 1.0);
        assert!((at(PatternType::Trend) - 0.9).abs() < 1e-12);
        assert!((at(PatternType::Anomaly) - 0.8).abs() < 1e-12);
        // 1.1 clamps to 1.0.
        assert_eq!(at(PatternType::Temporal), 1.0);
    }

    #[test]
    fn result_is_clamped() {
        let c = compute(PatternType::Temporal, 1000, 365.0, &ViewConfig::default());
        assert_eq!(c.value(), 1.0);
    }
}
