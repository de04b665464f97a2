//! PromotionGate: a pure decision over a view and its user's beliefs, and a
//! separate step that carries the decision out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use belief_core::config::GateConfig;
use belief_core::errors::{BeliefError, BeliefResult};
use belief_core::models::{Conflict, DerivedView, StableConcept, ViewStatus};
use belief_registry::ConceptRegistry;

use crate::conflict::ConflictDetector;
use crate::criteria::{self, GateCriterion};

/// What the gate wants done with a view, in precedence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// The view is already terminal. Nothing changes.
    NoOp { status: ViewStatus },
    /// Counter-evidence ratio above the rejection threshold.
    Reject { ratio: f64 },
    /// `now >= expires_at` without meeting the criteria.
    Expire,
    /// Keep observing. Non-empty `conflicts` flags the view for review.
    Hold {
        failed: Vec<GateCriterion>,
        conflicts: Vec<Conflict>,
    },
    Promote,
}

/// Result of applying a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub view_id: String,
    pub decision: GateDecision,
    pub status: ViewStatus,
    /// The concept created (or already created) by a promotion.
    pub concept: Option<StableConcept>,
}

impl GateOutcome {
    pub fn promoted(&self) -> bool {
        matches!(self.decision, GateDecision::Promote)
    }

    pub fn flagged(&self) -> bool {
        matches!(&self.decision, GateDecision::Hold { conflicts, .. } if !conflicts.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromotionGate {
    config: GateConfig,
    detector: ConflictDetector,
}

impl PromotionGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            detector: ConflictDetector::default(),
        }
    }

    pub fn with_detector(config: GateConfig, detector: ConflictDetector) -> Self {
        Self { config, detector }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    /// Decide without side effects.
    ///
    /// `active_views` and `concepts` are the user's other beliefs; the view
    /// itself may appear in `active_views` and is skipped.
    pub fn decide(
        &self,
        view: &DerivedView,
        active_views: &[DerivedView],
        concepts: &[StableConcept],
        now: DateTime<Utc>,
    ) -> GateDecision {
        if view.status.is_terminal() {
            return GateDecision::NoOp {
                status: view.status,
            };
        }
        let ratio = view.counter_evidence_ratio();
        if ratio > self.config.reject_counter_evidence_ratio {
            return GateDecision::Reject { ratio };
        }
        if view.is_expired_at(now) {
            return GateDecision::Expire;
        }

        let conflicts = self.detector.conflicts_for(view, active_views, concepts);
        let failed = criteria::failed(view, &conflicts, &self.config);
        if failed.is_empty() {
            GateDecision::Promote
        } else {
            GateDecision::Hold { failed, conflicts }
        }
    }

    /// Carry out `decision` on `view`.
    ///
    /// Promotion goes through the registry first; if that fails the view is
    /// left untouched and `GateEvaluationError` is returned.
    pub fn apply(
        &self,
        view: &mut DerivedView,
        decision: GateDecision,
        registry: &ConceptRegistry,
        now: DateTime<Utc>,
    ) -> BeliefResult<GateOutcome> {
        let mut concept = None;
        match &decision {
            GateDecision::NoOp { .. } => {}
            GateDecision::Reject { ratio } => {
                view.transition(ViewStatus::Rejected, now)?;
                info!(view_id = %view.id, ratio = *ratio, "view rejected on counter-evidence");
            }
            GateDecision::Expire => {
                view.transition(ViewStatus::Expired, now)?;
                debug!(view_id = %view.id, "view expired");
            }
            GateDecision::Hold { failed, conflicts } => {
                if !conflicts.is_empty() {
                    warn!(
                        view_id = %view.id,
                        conflicts = conflicts.len(),
                        "view flagged for conflict review"
                    );
                }
                view.conflicts = conflicts.clone();
                debug!(view_id = %view.id, failed = ?failed, "view held");
            }
            GateDecision::Promote => {
                let created = registry.promote(view, now).map_err(|e| match e {
                    BeliefError::GateEvaluationError { .. } => e,
                    other => BeliefError::GateEvaluationError {
                        view_id: view.id.clone(),
                        reason: other.to_string(),
                    },
                })?;
                view.transition(ViewStatus::Promoted, now)?;
                view.promoted_to = Some(created.concept_id.clone());
                concept = Some(created);
            }
        }

        Ok(GateOutcome {
            view_id: view.id.clone(),
            status: view.status,
            decision,
            concept,
        })
    }

    /// `decide` then `apply`.
    pub fn evaluate(
        &self,
        view: &mut DerivedView,
        active_views: &[DerivedView],
        concepts: &[StableConcept],
        registry: &ConceptRegistry,
        now: DateTime<Utc>,
    ) -> BeliefResult<GateOutcome> {
        let decision = self.decide(view, active_views, concepts, now);
        self.apply(view, decision, registry, now)
    }
}
