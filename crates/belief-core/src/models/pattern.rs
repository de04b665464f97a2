use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeRange;

/// The four pattern families. Closed set: every handler matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Repeated action on the same target.
    HighFrequency,
    /// Rising or falling volume between the two halves of the window.
    Trend,
    /// Recent period deviates from a trailing baseline.
    Anomaly,
    /// Occurrences concentrate on particular weekdays.
    Temporal,
}

impl PatternType {
    pub const ALL: [PatternType; 4] = [
        PatternType::HighFrequency,
        PatternType::Trend,
        PatternType::Anomaly,
        PatternType::Temporal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighFrequency => "high_frequency",
            Self::Trend => "trend",
            Self::Anomaly => "anomaly",
            Self::Temporal => "temporal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

/// Family-specific measurements behind a detected pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternMetadata {
    HighFrequency {
        occurrences_per_day: f64,
    },
    Trend {
        direction: TrendDirection,
        /// Relative change, signed (0.6 = +60%).
        change_ratio: f64,
        first_half_value: f64,
        second_half_value: f64,
        /// True when compared on summed quantity, false when on frequency.
        by_quantity: bool,
    },
    Anomaly {
        expected_per_day: f64,
        actual_per_day: f64,
        /// Signed relative deviation from baseline.
        deviation_ratio: f64,
        baseline_days: i64,
    },
    Temporal {
        /// Weekdays (0 = Monday) that are over-represented.
        weekdays: Vec<u32>,
        /// Share of all occurrences falling on those weekdays.
        share: f64,
        /// Share a uniform spread would give those weekdays.
        expected_share: f64,
        weeks_observed: u32,
    },
}

/// A statistically supported pattern in one user's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    /// Deterministic: identical snapshot in, identical id out.
    pub id: String,
    pub pattern_type: PatternType,
    pub user_id: String,
    pub action: String,
    pub target: String,
    pub description: String,
    /// Supporting event ids in timestamp order.
    pub evidence: Vec<String>,
    /// Regularity in [0, 1].
    pub consistency: f64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub metadata: PatternMetadata,
}

impl DetectedPattern {
    /// Stable id from the fields that identify a pattern within a window.
    pub fn derive_id(
        user_id: &str,
        pattern_type: PatternType,
        action: &str,
        target: &str,
        discriminator: &str,
        window: &TimeRange,
    ) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [
            user_id,
            pattern_type.as_str(),
            action,
            target,
            discriminator,
            &window.start.to_rfc3339(),
            &window.end.to_rfc3339(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(&[0x1f]);
        }
        let hex = hasher.finalize().to_hex();
        format!("pat_{}", &hex[..24])
    }

    pub fn evidence_count(&self) -> usize {
        self.evidence.len()
    }

    /// Span between first and most recent supporting evidence, in days.
    pub fn time_span_days(&self) -> f64 {
        (self.last_seen - self.first_seen).num_seconds().max(0) as f64 / 86_400.0
    }
}

/// Output of one detector run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDetectionResult {
    pub user_id: String,
    pub patterns: Vec<DetectedPattern>,
    pub events_analyzed: usize,
    pub window: TimeRange,
}

impl PatternDetectionResult {
    pub fn of_type(&self, pattern_type: PatternType) -> impl Iterator<Item = &DetectedPattern> {
        self.patterns
            .iter()
            .filter(move |p| p.pattern_type == pattern_type)
    }
}
