//! ConceptRegistry: promote, deprecate, rollback and lookup over `IConceptStorage`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use belief_core::errors::{BeliefError, BeliefResult};
use belief_core::models::{DeprecationOutcome, DerivedView, StableConcept};
use belief_core::traits::IConceptStorage;
use belief_core::Confidence;

/// Version-chained store of promoted beliefs.
///
/// Keeps at most one non-deprecated concept per `(user_id, canonical_name)`:
/// every new version is appended together with the deprecation of the
/// version it supersedes, in one storage transaction.
pub struct ConceptRegistry {
    storage: Arc<dyn IConceptStorage>,
}

impl ConceptRegistry {
    pub fn new(storage: Arc<dyn IConceptStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn IConceptStorage> {
        &self.storage
    }

    /// Create the next version of the chain `view` belongs to.
    ///
    /// Version 1 for a new canonical name; otherwise `current.version + 1`
    /// with the current version deprecated in the same commit. A chain whose
    /// versions are all deprecated continues from its latest version.
    /// Promoting a view that already produced the current version returns
    /// that version unchanged.
    pub fn promote(&self, view: &DerivedView, now: DateTime<Utc>) -> BeliefResult<StableConcept> {
        if !view.confidence.is_promotable() {
            return Err(BeliefError::GateEvaluationError {
                view_id: view.id.clone(),
                reason: format!(
                    "confidence {} is not above {}",
                    view.confidence,
                    Confidence::PROMOTION
                ),
            });
        }

        let canonical_name = StableConcept::canonical_name_for(view);
        let current = self.storage.current_concept(&view.user_id, &canonical_name)?;

        if let Some(existing) = current.as_ref().filter(|c| c.promoted_from == view.id) {
            debug!(view_id = %view.id, concept_id = %existing.concept_id, "view already promoted");
            return Ok(existing.clone());
        }

        let (concept, supersedes) = match current {
            Some(prior) => (prior.superseded_by_view(view, now), Some(prior.concept_id)),
            None => {
                let chain = self.storage.concept_chain(&view.user_id, &canonical_name)?;
                match chain.last() {
                    Some(latest) => (latest.superseded_by_view(view, now), None),
                    None => (StableConcept::first_version(view, &canonical_name, now), None),
                }
            }
        };

        self.storage
            .append_version(&concept, supersedes.as_deref(), now)?;
        info!(
            user_id = %concept.user_id,
            canonical_name = %concept.canonical_name,
            concept_id = %concept.concept_id,
            version = concept.version,
            view_id = %view.id,
            "concept promoted"
        );
        Ok(concept)
    }

    /// Mark a concept deprecated. Deprecating twice reports a no-op.
    pub fn deprecate(
        &self,
        concept_id: &str,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> BeliefResult<DeprecationOutcome> {
        let outcome = self.storage.deprecate_concept(concept_id, now, reason)?;
        if outcome.was_noop() {
            debug!(concept_id, "concept already deprecated");
        } else {
            info!(concept_id, reason = reason.unwrap_or(""), "concept deprecated");
        }
        Ok(outcome)
    }

    /// Append a new version carrying the content of `target_version`.
    ///
    /// `concept_id` may name any version of the chain. The target and every
    /// other existing version are left untouched.
    pub fn rollback(
        &self,
        concept_id: &str,
        target_version: u32,
        now: DateTime<Utc>,
    ) -> BeliefResult<StableConcept> {
        let anchor = self
            .storage
            .get_concept(concept_id)?
            .ok_or_else(|| BeliefError::ConceptNotFound {
                id: concept_id.to_string(),
            })?;
        let chain = self
            .storage
            .concept_chain(&anchor.user_id, &anchor.canonical_name)?;

        let target = chain
            .iter()
            .find(|c| c.version == target_version)
            .ok_or_else(|| BeliefError::VersionNotFound {
                canonical_name: anchor.canonical_name.clone(),
                version: target_version,
            })?;
        let current = chain.iter().find(|c| c.is_current());
        let head = current.or(chain.last()).ok_or_else(|| BeliefError::ConceptNotFound {
            id: concept_id.to_string(),
        })?;

        let successor = head.rollback_successor(target, now);
        self.storage.append_version(
            &successor,
            current.map(|c| c.concept_id.as_str()),
            now,
        )?;
        info!(
            canonical_name = %successor.canonical_name,
            from_version = head.version,
            target_version,
            new_version = successor.version,
            "concept rolled back"
        );
        Ok(successor)
    }

    /// The unique non-deprecated version, if any.
    pub fn current(
        &self,
        user_id: &str,
        canonical_name: &str,
    ) -> BeliefResult<Option<StableConcept>> {
        self.storage.current_concept(user_id, canonical_name)
    }

    /// Every version of a chain, ascending.
    pub fn history(&self, user_id: &str, canonical_name: &str) -> BeliefResult<Vec<StableConcept>> {
        self.storage.concept_chain(user_id, canonical_name)
    }

    pub fn current_concepts(&self, user_id: &str) -> BeliefResult<Vec<StableConcept>> {
        self.storage.current_concepts(user_id)
    }

    pub fn get(&self, concept_id: &str) -> BeliefResult<Option<StableConcept>> {
        self.storage.get_concept(concept_id)
    }

    pub fn record_access(&self, concept_id: &str, now: DateTime<Utc>) -> BeliefResult<()> {
        self.storage.record_access(concept_id, now)
    }
}
