//! ViewGenerator: pattern → derived view, and re-confirmation of existing views.

use belief_core::config::ViewConfig;
use belief_core::constants::PATTERN_DETECTOR_SOURCE;
use belief_core::models::{DerivedView, DetectedPattern, PatternType, ViewType};
use belief_core::Confidence;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::expiration;
use crate::formula::{self, ConfidenceBreakdown};
use crate::hypothesis;

/// Pure transformation from detected patterns to derived views.
#[derive(Debug, Clone, Default)]
pub struct ViewGenerator {
    config: ViewConfig,
}

/// What happened when a pattern was matched against an existing view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reconfirmation {
    /// New evidence was appended and the view re-scored.
    Reconfirmed {
        new_evidence: usize,
        confidence: Confidence,
    },
    /// Same hypothesis, but every evidence id was already known.
    NoNewEvidence,
    /// The view is terminal or states a different hypothesis.
    NotApplicable,
}

impl ViewGenerator {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Confidence a fresh view for `pattern` would carry.
    pub fn confidence_for(&self, pattern: &DetectedPattern) -> Confidence {
        self.breakdown_for(pattern).final_confidence
    }

    pub fn breakdown_for(&self, pattern: &DetectedPattern) -> ConfidenceBreakdown {
        formula::compute_breakdown(
            pattern.pattern_type,
            pattern.evidence_count(),
            pattern.time_span_days(),
            &self.config,
        )
    }

    /// Hypothesis key a view generated from `pattern` would have.
    pub fn key_for(pattern: &DetectedPattern) -> String {
        DerivedView::key_for(
            &pattern.user_id,
            ViewType::from(pattern.pattern_type),
            &hypothesis::render(pattern),
        )
    }

    /// View for `pattern`, or `None` when its confidence is below `min_confidence`.
    pub fn generate_view(&self, pattern: &DetectedPattern, now: DateTime<Utc>) -> Option<DerivedView> {
        let confidence = self.confidence_for(pattern);
        if confidence.value() < self.config.min_confidence {
            debug!(
                pattern_id = %pattern.id,
                confidence = confidence.value(),
                "pattern below view confidence floor"
            );
            return None;
        }
        let expires_at =
            expiration::expires_at(now, confidence, self.config.default_expiration_days);
        Some(self.build(pattern, confidence, now, expires_at))
    }

    /// Like [`generate_view`](Self::generate_view) with a caller-chosen expiry,
    /// pulled into the allowed [15, 60] day lifetime.
    pub fn generate_view_with_expiration(
        &self,
        pattern: &DetectedPattern,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Option<DerivedView> {
        let confidence = self.confidence_for(pattern);
        if confidence.value() < self.config.min_confidence {
            return None;
        }
        Some(self.build(pattern, confidence, now, expiration::clamp_expiry(now, expires_at)))
    }

    /// Views for every pattern at or above the configured floor.
    pub fn generate_views(&self, patterns: &[DetectedPattern], now: DateTime<Utc>) -> Vec<DerivedView> {
        self.generate_views_filtered(patterns, now, self.config.min_confidence)
    }

    /// Views for every pattern whose confidence reaches `min_confidence`.
    /// The configured floor still applies.
    pub fn generate_views_filtered(
        &self,
        patterns: &[DetectedPattern],
        now: DateTime<Utc>,
        min_confidence: f64,
    ) -> Vec<DerivedView> {
        patterns
            .iter()
            .filter(|p| self.confidence_for(p).value() >= min_confidence)
            .filter_map(|p| self.generate_view(p, now))
            .collect()
    }

    /// Fold a re-detected pattern into an existing active view with the same
    /// hypothesis. Evidence is appended (never replaced), `validated_count`
    /// goes up by one, and confidence is recomputed over the merged evidence.
    /// The expiry is left alone.
    pub fn reconfirm(
        &self,
        view: &mut DerivedView,
        pattern: &DetectedPattern,
        now: DateTime<Utc>,
    ) -> Reconfirmation {
        if !view.is_active() || view.hypothesis_key() != Self::key_for(pattern) {
            return Reconfirmation::NotApplicable;
        }
        let new_evidence = view.append_evidence(pattern.evidence.iter().cloned());
        if new_evidence == 0 {
            return Reconfirmation::NoNewEvidence;
        }

        view.first_evidence_at = view.first_evidence_at.min(pattern.first_seen);
        view.last_evidence_at = view.last_evidence_at.max(pattern.last_seen);
        view.validated_count += 1;
        view.confidence = self.rescore(view, pattern.pattern_type);
        view.description = Some(pattern.description.clone());
        view.last_validated_at = Some(now);
        view.updated_at = now;

        debug!(
            view_id = %view.id,
            new_evidence,
            validated_count = view.validated_count,
            confidence = view.confidence.value(),
            "view reconfirmed"
        );
        Reconfirmation::Reconfirmed {
            new_evidence,
            confidence: view.confidence,
        }
    }

    fn rescore(&self, view: &DerivedView, pattern_type: PatternType) -> Confidence {
        let span_days = view.time_span().num_seconds().max(0) as f64 / 86_400.0;
        formula::compute(pattern_type, view.derived_from.len(), span_days, &self.config)
    }

    fn build(
        &self,
        pattern: &DetectedPattern,
        confidence: Confidence,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DerivedView {
        DerivedView::new(
            pattern.user_id.clone(),
            hypothesis::render(pattern),
            ViewType::from(pattern.pattern_type),
            pattern.evidence.clone(),
            now,
        )
        .with_confidence(confidence)
        .with_expiration(expires_at)
        .with_description(&pattern.description)
        .with_subject(&pattern.action, &pattern.target)
        .with_evidence_span(pattern.first_seen, pattern.last_seen)
        .with_source(PATTERN_DETECTOR_SOURCE)
    }
}
