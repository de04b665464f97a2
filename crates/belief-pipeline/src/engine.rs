//! BeliefPipeline: the per-user evolution cycle.
//!
//! events → patterns → views (new or reconfirmed) → gate → registry.
//! Everything a cycle reads comes from one event query and one read of the
//! user's active views and current concepts, so the four pattern families
//! and every gate decision see the same state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use belief_core::config::BeliefConfig;
use belief_core::errors::{BeliefError, BeliefResult};
use belief_core::models::{DetectedPattern, EventQuery, StableConcept, ViewStatus};
use belief_core::traits::{Cancellable, IConceptStorage, IEventSource, IViewStorage};
use belief_gate::{GateDecision, PromotionGate};
use belief_observability::tracing_setup::events;
use belief_observability::{detection_span, gate_span, promotion_span, PipelineMetrics};
use belief_patterns::PatternDetector;
use belief_registry::ConceptRegistry;
use belief_views::{Reconfirmation, ViewGenerator};

use crate::counter_evidence::CounterEvidenceRecorder;
use crate::locks::ViewLocks;
use crate::report::CycleReport;

pub struct BeliefPipeline {
    pub(crate) events: Arc<dyn IEventSource>,
    pub(crate) views: Arc<dyn IViewStorage>,
    pub(crate) registry: ConceptRegistry,
    detector: PatternDetector,
    generator: ViewGenerator,
    gate: PromotionGate,
    locks: Arc<ViewLocks>,
    metrics: Arc<PipelineMetrics>,
    config: BeliefConfig,
}

impl BeliefPipeline {
    pub fn new(
        config: BeliefConfig,
        events: Arc<dyn IEventSource>,
        views: Arc<dyn IViewStorage>,
        concepts: Arc<dyn IConceptStorage>,
    ) -> Self {
        Self {
            events,
            views,
            registry: ConceptRegistry::new(concepts),
            detector: PatternDetector::new(config.detection.clone()),
            generator: ViewGenerator::new(config.views.clone()),
            gate: PromotionGate::new(config.gate.clone()),
            locks: Arc::new(ViewLocks::new()),
            metrics: Arc::new(PipelineMetrics::new()),
            config,
        }
    }

    /// Pipeline over a single store that serves events, views and concepts.
    pub fn with_store<S>(config: BeliefConfig, store: Arc<S>) -> Self
    where
        S: IEventSource + IViewStorage + IConceptStorage + 'static,
    {
        let events: Arc<dyn IEventSource> = store.clone();
        let views: Arc<dyn IViewStorage> = store.clone();
        let concepts: Arc<dyn IConceptStorage> = store;
        Self::new(config, events, views, concepts)
    }

    pub fn config(&self) -> &BeliefConfig {
        &self.config
    }

    pub fn registry(&self) -> &ConceptRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    pub fn locks(&self) -> &Arc<ViewLocks> {
        &self.locks
    }

    /// Recorder sharing this pipeline's view locks.
    pub fn counter_evidence(&self) -> CounterEvidenceRecorder {
        CounterEvidenceRecorder::new(
            Arc::clone(&self.views),
            Arc::clone(&self.locks),
            self.config.gate.clone(),
        )
    }

    /// One full cycle for `user_id` as of `now`.
    ///
    /// Fails with `InputError` on a malformed event batch (nothing is written)
    /// and with `Cancelled` when `cancel` fires. A promotion that fails in
    /// storage is recorded in the report and the view stays active.
    pub fn run_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        cancel: &dyn Cancellable,
    ) -> BeliefResult<CycleReport> {
        let span = detection_span!(user_id);
        let _entered = span.enter();
        let result = self.run_cycle(user_id, now, cancel);
        // Locks of views this cycle touched are idle again.
        self.locks.prune();
        result
    }

    fn run_cycle(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        cancel: &dyn Cancellable,
    ) -> BeliefResult<CycleReport> {
        let mut report = CycleReport::new(user_id);

        let window = self.detector.window_ending(now);
        let query = EventQuery::for_user(user_id, self.detector.snapshot_range(&window));
        let snapshot = self.events.query_events(&query)?;
        let detection = self.detector.detect(user_id, &snapshot, window, cancel)?;
        report.window = Some(window);
        report.events_analyzed = detection.events_analyzed;
        report.patterns_detected = detection.patterns.len();

        self.absorb_patterns(user_id, &detection.patterns, now, cancel, &mut report)?;
        self.evaluate_views(user_id, now, cancel, &mut report)?;

        self.record_metrics(&report);
        info!(
            user_id = %user_id,
            patterns = report.patterns_detected,
            created = report.views_created.len(),
            reconfirmed = report.views_reconfirmed.len(),
            concepts_reconfirmed = report.concepts_reconfirmed.len(),
            promoted = report.promoted.len(),
            flagged = report.flagged.len(),
            "cycle complete"
        );
        Ok(report)
    }

    /// Fold each pattern into the active view with the same hypothesis, or
    /// create a new view for it. A pattern restating a current concept only
    /// touches that concept, so a stable belief keeps its version.
    fn absorb_patterns(
        &self,
        user_id: &str,
        patterns: &[DetectedPattern],
        now: DateTime<Utc>,
        cancel: &dyn Cancellable,
        report: &mut CycleReport,
    ) -> BeliefResult<()> {
        let mut by_key: HashMap<String, String> = self
            .views
            .views_for_user(user_id, Some(ViewStatus::Active))?
            .into_iter()
            .map(|v| (v.hypothesis_key(), v.id))
            .collect();
        let concepts = self.registry.current_concepts(user_id)?;

        for pattern in patterns {
            check_cancel(user_id, cancel)?;
            let key = ViewGenerator::key_for(pattern);
            match by_key.get(&key) {
                Some(view_id) => {
                    let view_id = view_id.clone();
                    self.locks.with_view(&view_id, || {
                        let Some(mut view) = self.views.get_view(&view_id)? else {
                            return Ok(());
                        };
                        if let Reconfirmation::Reconfirmed { new_evidence, .. } =
                            self.generator.reconfirm(&mut view, pattern, now)
                        {
                            self.views.update_view(&view)?;
                            events::view_reconfirmed(&view.id, new_evidence, view.validated_count);
                            if !report.views_reconfirmed.contains(&view.id) {
                                report.views_reconfirmed.push(view.id.clone());
                            }
                        }
                        Ok(())
                    })?;
                }
                None => {
                    let Some(view) = self.generator.generate_view(pattern, now) else {
                        continue;
                    };
                    if let Some(concept) = concepts.iter().find(|c| c.restated_by(&view)) {
                        if !report.concepts_reconfirmed.contains(&concept.concept_id) {
                            self.registry.record_access(&concept.concept_id, now)?;
                            events::concept_reconfirmed(&concept.concept_id, &view.hypothesis);
                            report.concepts_reconfirmed.push(concept.concept_id.clone());
                        }
                        continue;
                    }
                    self.views.insert_view(&view)?;
                    events::view_created(
                        &view.id,
                        user_id,
                        view.view_type.as_str(),
                        view.confidence.value(),
                    );
                    report.views_created.push(view.id.clone());
                    by_key.insert(key, view.id);
                }
            }
        }
        Ok(())
    }

    /// Gate every active view of the user. Expiry is one of the gate's
    /// outcomes, so this is also the expiry sweep.
    fn evaluate_views(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        cancel: &dyn Cancellable,
        report: &mut CycleReport,
    ) -> BeliefResult<()> {
        let mut active = self.views.views_for_user(user_id, Some(ViewStatus::Active))?;
        let mut concepts = self.registry.current_concepts(user_id)?;

        for idx in 0..active.len() {
            check_cancel(user_id, cancel)?;
            let view_id = active[idx].id.clone();
            let span = gate_span!(view_id);
            let _entered = span.enter();

            let evaluated = self.locks.with_view(&view_id, || {
                // Counter-evidence may have landed since the snapshot.
                let Some(mut view) = self.views.get_view(&view_id)? else {
                    return Ok(None);
                };
                let decision = self.gate.decide(&view, &active, &concepts, now);
                if matches!(decision, GateDecision::NoOp { .. }) {
                    return Ok(Some((view, None)));
                }
                let _promotion = matches!(decision, GateDecision::Promote)
                    .then(|| promotion_span!(StableConcept::canonical_name_for(&view)).entered());
                match self.gate.apply(&mut view, decision, &self.registry, now) {
                    Ok(outcome) => {
                        self.views.update_view(&view)?;
                        Ok(Some((view, Some(outcome))))
                    }
                    Err(err @ BeliefError::GateEvaluationError { .. }) => {
                        error!(view_id = %view_id, error = %err, "promotion failed closed");
                        report.gate_errors.push((view_id.clone(), err.to_string()));
                        Ok(None)
                    }
                    Err(other) => Err(other),
                }
            })?;

            let Some((view, outcome)) = evaluated else {
                continue;
            };
            if let Some(outcome) = outcome {
                match &outcome.decision {
                    GateDecision::Promote => {
                        if let Some(concept) = &outcome.concept {
                            report.promoted.push((view.id.clone(), concept.concept_id.clone()));
                        }
                        concepts = self.registry.current_concepts(user_id)?;
                        events::view_transitioned(&view.id, ViewStatus::Promoted.as_str());
                    }
                    GateDecision::Reject { .. } => {
                        report.rejected.push(view.id.clone());
                        events::view_transitioned(&view.id, ViewStatus::Rejected.as_str());
                    }
                    GateDecision::Expire => {
                        report.expired.push(view.id.clone());
                        events::view_transitioned(&view.id, ViewStatus::Expired.as_str());
                    }
                    GateDecision::Hold { conflicts, .. } if !conflicts.is_empty() => {
                        report.flagged.push(view.id.clone());
                        for c in conflicts {
                            events::conflict_flagged(&view.id, c.counterpart.id(), &c.target);
                        }
                    }
                    GateDecision::Hold { .. } | GateDecision::NoOp { .. } => {}
                }
            }
            active[idx] = view;
        }
        debug!(user_id = %user_id, evaluated = active.len(), "gate pass complete");
        Ok(())
    }

    fn record_metrics(&self, report: &CycleReport) {
        let m = &self.metrics;
        m.add_cycles_completed(1);
        m.add_patterns_detected(report.patterns_detected as u64);
        m.add_views_created(report.views_created.len() as u64);
        m.add_views_reconfirmed(report.views_reconfirmed.len() as u64);
        m.add_views_promoted(report.promoted.len() as u64);
        m.add_views_rejected(report.rejected.len() as u64);
        m.add_views_expired(report.expired.len() as u64);
        m.add_conflicts_flagged(report.flagged.len() as u64);
    }
}

fn check_cancel(user_id: &str, cancel: &dyn Cancellable) -> BeliefResult<()> {
    if cancel.is_cancelled() {
        return Err(BeliefError::Cancelled {
            user_id: user_id.to_string(),
        });
    }
    Ok(())
}
