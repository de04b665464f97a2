use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::PatternType;

/// View generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Base lifetime, scaled by confidence and clamped to [15, 60] days.
    pub default_expiration_days: i64,
    pub high_frequency_multiplier: f64,
    pub trend_multiplier: f64,
    pub anomaly_multiplier: f64,
    pub temporal_multiplier: f64,
    /// Views below this confidence are not emitted.
    pub min_confidence: f64,
    /// Span at which the time-span bonus is exactly 1.0.
    pub timespan_reference_days: f64,
}

impl ViewConfig {
    pub fn multiplier(&self, pattern_type: PatternType) -> f64 {
        match pattern_type {
            PatternType::HighFrequency => self.high_frequency_multiplier,
            PatternType::Trend => self.trend_multiplier,
            PatternType::Anomaly => self.anomaly_multiplier,
            PatternType::Temporal => self.temporal_multiplier,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_expiration_days: defaults::DEFAULT_VIEW_EXPIRATION_DAYS,
            high_frequency_multiplier: defaults::DEFAULT_HIGH_FREQUENCY_MULTIPLIER,
            trend_multiplier: defaults::DEFAULT_TREND_MULTIPLIER,
            anomaly_multiplier: defaults::DEFAULT_ANOMALY_MULTIPLIER,
            temporal_multiplier: defaults::DEFAULT_TEMPORAL_MULTIPLIER,
            min_confidence: defaults::DEFAULT_MIN_VIEW_CONFIDENCE,
            timespan_reference_days: defaults::DEFAULT_TIMESPAN_REFERENCE_DAYS,
        }
    }
}
