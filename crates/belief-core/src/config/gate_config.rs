use serde::{Deserialize, Serialize};

use super::defaults;

/// Promotion gate criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Confidence must be strictly greater.
    pub min_confidence: f64,
    pub min_time_span_days: i64,
    pub min_validated_count: u32,
    /// Counter-evidence ratio must be strictly less.
    pub max_counter_evidence_ratio: f64,
    /// Above this ratio the view is rejected outright.
    pub reject_counter_evidence_ratio: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_confidence: defaults::DEFAULT_PROMOTION_CONFIDENCE,
            min_time_span_days: defaults::DEFAULT_PROMOTION_TIME_SPAN_DAYS,
            min_validated_count: defaults::DEFAULT_PROMOTION_VALIDATED_COUNT,
            max_counter_evidence_ratio: defaults::DEFAULT_MAX_COUNTER_EVIDENCE_RATIO,
            reject_counter_evidence_ratio: defaults::DEFAULT_REJECT_COUNTER_EVIDENCE_RATIO,
        }
    }
}
