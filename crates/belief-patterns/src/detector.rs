//! PatternDetector: runs every family over one consistent snapshot.

use belief_core::config::DetectionConfig;
use belief_core::models::{DetectedPattern, PatternDetectionResult, PatternType};
use belief_core::traits::Cancellable;
use belief_core::{BeliefError, BeliefResult, Event, TimeRange};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::families::{self, DetectionInput};
use crate::grouping;

/// Detects patterns in one user's events. Stateless apart from its thresholds:
/// the same events and window always yield the same patterns, ids included.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: DetectionConfig,
}

impl PatternDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detection window ending at `now`.
    pub fn window_ending(&self, now: DateTime<Utc>) -> TimeRange {
        TimeRange::last_n_days(now, self.config.lookback_days)
    }

    /// Trailing baseline the anomaly family compares against.
    pub fn baseline_for(&self, window: &TimeRange) -> TimeRange {
        window.preceding(self.config.anomaly_baseline_days)
    }

    /// Range to fetch in a single query so every family sees the same events.
    pub fn snapshot_range(&self, window: &TimeRange) -> TimeRange {
        self.baseline_for(window).union(window)
    }

    /// Run all four families over `events`.
    ///
    /// `events` may extend beyond `window`; only the window and its baseline
    /// are read. Fails with `InputError` on a malformed batch and with
    /// `Cancelled` if `cancel` fires between families.
    pub fn detect(
        &self,
        user_id: &str,
        events: &[Event],
        window: TimeRange,
        cancel: &dyn Cancellable,
    ) -> BeliefResult<PatternDetectionResult> {
        validate_events(user_id, events)?;

        let mut sorted = events.to_vec();
        sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

        let baseline = self.baseline_for(&window);
        let input = DetectionInput {
            user_id,
            window,
            baseline,
            current: grouping::in_window(&sorted, &window),
            previous: grouping::in_baseline(&sorted, &baseline),
            config: &self.config,
        };
        let events_analyzed = input.current.values().map(Vec::len).sum();

        let mut patterns: Vec<DetectedPattern> = Vec::new();
        for pattern_type in PatternType::ALL {
            if cancel.is_cancelled() {
                return Err(BeliefError::Cancelled {
                    user_id: user_id.to_string(),
                });
            }
            let found = match pattern_type {
                PatternType::HighFrequency => families::high_frequency::detect(&input),
                PatternType::Trend => families::trend::detect(&input),
                PatternType::Anomaly => families::anomaly::detect(&input),
                PatternType::Temporal => families::temporal::detect(&input),
            };
            debug!(
                user_id = %user_id,
                pattern_type = %pattern_type,
                count = found.len(),
                "pattern family evaluated"
            );
            patterns.extend(found);
        }

        info!(
            user_id = %user_id,
            events = events_analyzed,
            patterns = patterns.len(),
            "pattern detection complete"
        );

        Ok(PatternDetectionResult {
            user_id: user_id.to_string(),
            patterns,
            events_analyzed,
            window,
        })
    }
}

/// Reject a batch containing structurally invalid events or events of
/// another user. An empty batch is valid and simply yields no patterns.
pub fn validate_events(user_id: &str, events: &[Event]) -> BeliefResult<()> {
    if user_id.trim().is_empty() {
        return Err(BeliefError::InputError {
            user_id: user_id.to_string(),
            reason: "empty user id".to_string(),
        });
    }
    for event in events {
        if event.user_id != user_id {
            return Err(BeliefError::InputError {
                user_id: user_id.to_string(),
                reason: format!("event {} belongs to user {}", event.id, event.user_id),
            });
        }
        if let Some(reason) = event.validation_problem() {
            return Err(BeliefError::InputError {
                user_id: user_id.to_string(),
                reason,
            });
        }
    }
    Ok(())
}
