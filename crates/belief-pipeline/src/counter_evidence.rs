//! Incremental counter-evidence, outside the batch cycle.
//!
//! Appends happen under the same per-view lock the gate takes, so a view is
//! never contradicted and evaluated at the same time. Crossing the rejection
//! ratio rejects the view on the spot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use belief_core::config::GateConfig;
use belief_core::errors::{BeliefError, BeliefResult};
use belief_core::models::ViewStatus;
use belief_core::traits::IViewStorage;

use crate::locks::ViewLocks;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CounterEvidenceOutcome {
    Recorded {
        added: usize,
        ratio: f64,
        rejected: bool,
    },
    /// Every id was already known, or was supporting evidence.
    Unchanged,
    /// The view is terminal; counter-evidence no longer applies.
    Ignored { status: ViewStatus },
}

pub struct CounterEvidenceRecorder {
    views: Arc<dyn IViewStorage>,
    locks: Arc<ViewLocks>,
    config: GateConfig,
}

impl CounterEvidenceRecorder {
    pub fn new(views: Arc<dyn IViewStorage>, locks: Arc<ViewLocks>, config: GateConfig) -> Self {
        Self {
            views,
            locks,
            config,
        }
    }

    /// Append `event_ids` to the view's counter-evidence.
    pub fn record(
        &self,
        view_id: &str,
        event_ids: &[String],
        now: DateTime<Utc>,
    ) -> BeliefResult<CounterEvidenceOutcome> {
        self.locks.with_view(view_id, || {
            let mut view = self
                .views
                .get_view(view_id)?
                .ok_or_else(|| BeliefError::ViewNotFound {
                    id: view_id.to_string(),
                })?;
            if view.status.is_terminal() {
                return Ok(CounterEvidenceOutcome::Ignored {
                    status: view.status,
                });
            }

            let fresh: Vec<String> = event_ids
                .iter()
                .filter(|id| !view.derived_from.contains(id))
                .cloned()
                .collect();
            let added = view.add_counter_evidence(fresh);
            if added == 0 {
                return Ok(CounterEvidenceOutcome::Unchanged);
            }

            let ratio = view.counter_evidence_ratio();
            let rejected = ratio > self.config.reject_counter_evidence_ratio;
            if rejected {
                view.transition(ViewStatus::Rejected, now)?;
                info!(view_id = %view_id, ratio, "view rejected on counter-evidence");
            } else {
                view.updated_at = now;
            }
            self.views.update_view(&view)?;
            Ok(CounterEvidenceOutcome::Recorded {
                added,
                ratio,
                rejected,
            })
        })
    }
}
