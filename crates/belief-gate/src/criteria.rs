//! The six promotion criteria, each checkable on its own.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use belief_core::config::GateConfig;
use belief_core::models::{Conflict, DerivedView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateCriterion {
    Confidence,
    TimeSpan,
    ValidatedCount,
    CounterEvidenceRatio,
    ActiveStatus,
    NoConflict,
}

impl GateCriterion {
    pub const ALL: [GateCriterion; 6] = [
        GateCriterion::Confidence,
        GateCriterion::TimeSpan,
        GateCriterion::ValidatedCount,
        GateCriterion::CounterEvidenceRatio,
        GateCriterion::ActiveStatus,
        GateCriterion::NoConflict,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confidence => "confidence",
            Self::TimeSpan => "time_span",
            Self::ValidatedCount => "validated_count",
            Self::CounterEvidenceRatio => "counter_evidence_ratio",
            Self::ActiveStatus => "active_status",
            Self::NoConflict => "no_conflict",
        }
    }

    /// Whether `view` satisfies this criterion. `conflicts` are the view's
    /// unresolved conflicts on this cycle.
    pub fn holds(self, view: &DerivedView, conflicts: &[Conflict], config: &GateConfig) -> bool {
        match self {
            Self::Confidence => view.confidence.value() > config.min_confidence,
            Self::TimeSpan => view.time_span() >= Duration::days(config.min_time_span_days),
            Self::ValidatedCount => view.validated_count >= config.min_validated_count,
            Self::CounterEvidenceRatio => {
                view.counter_evidence_ratio() < config.max_counter_evidence_ratio
            }
            Self::ActiveStatus => view.is_active(),
            Self::NoConflict => conflicts.is_empty(),
        }
    }
}

impl fmt::Display for GateCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criteria `view` fails, in declaration order.
pub fn failed(view: &DerivedView, conflicts: &[Conflict], config: &GateConfig) -> Vec<GateCriterion> {
    GateCriterion::ALL
        .into_iter()
        .filter(|c| !c.holds(view, conflicts, config))
        .collect()
}
