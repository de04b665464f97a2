use serde::{Deserialize, Serialize};

use super::defaults;

/// Pattern detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Length of the detection window ending at the cycle time.
    pub lookback_days: i64,
    /// Minimum occurrences of an (action, target) pair for any pattern.
    pub min_occurrences: usize,
    /// High-frequency: minimum occurrences per day over the pair's own span.
    pub min_frequency_per_day: f64,
    /// High-frequency: minimum regularity score.
    pub min_consistency: f64,
    /// Trend: the window must be at least this long.
    pub min_trend_window_days: i64,
    /// Trend: minimum relative change between halves.
    pub min_trend_change: f64,
    /// Anomaly: length of the trailing baseline before the window.
    pub anomaly_baseline_days: i64,
    /// Anomaly: minimum relative deviation from the baseline mean.
    pub min_anomaly_deviation: f64,
    /// Anomaly: baselines sparser than this are ignored.
    pub min_baseline_per_day: f64,
    /// Temporal: minimum occurrences before weekday analysis.
    pub temporal_min_occurrences: usize,
    /// Temporal: a weekday must hold this many times its uniform share.
    pub temporal_min_lift: f64,
    /// Temporal: minimum distinct weeks touched.
    pub temporal_min_weeks: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            lookback_days: defaults::DEFAULT_LOOKBACK_DAYS,
            min_occurrences: defaults::DEFAULT_MIN_OCCURRENCES,
            min_frequency_per_day: defaults::DEFAULT_MIN_FREQUENCY_PER_DAY,
            min_consistency: defaults::DEFAULT_MIN_CONSISTENCY,
            min_trend_window_days: defaults::DEFAULT_MIN_TREND_WINDOW_DAYS,
            min_trend_change: defaults::DEFAULT_MIN_TREND_CHANGE,
            anomaly_baseline_days: defaults::DEFAULT_ANOMALY_BASELINE_DAYS,
            min_anomaly_deviation: defaults::DEFAULT_MIN_ANOMALY_DEVIATION,
            min_baseline_per_day: defaults::DEFAULT_MIN_BASELINE_PER_DAY,
            temporal_min_occurrences: defaults::DEFAULT_TEMPORAL_MIN_OCCURRENCES,
            temporal_min_lift: defaults::DEFAULT_TEMPORAL_MIN_LIFT,
            temporal_min_weeks: defaults::DEFAULT_TEMPORAL_MIN_WEEKS,
        }
    }
}
