//! Read-only surface for agents and reviewers.

use std::collections::HashSet;

use tracing::debug;

use belief_core::errors::BeliefResult;
use belief_core::models::{
    ConflictCounterpart, DerivedView, FlaggedConflict, FlaggedCounterpart, StableConcept,
    ViewStatus,
};

use crate::engine::BeliefPipeline;

impl BeliefPipeline {
    /// Non-deprecated concepts, for grounding responses.
    pub fn current_concepts(&self, user_id: &str) -> BeliefResult<Vec<StableConcept>> {
        self.registry.current_concepts(user_id)
    }

    /// Unconfirmed beliefs still under observation.
    pub fn active_views(&self, user_id: &str) -> BeliefResult<Vec<DerivedView>> {
        self.views.views_for_user(user_id, Some(ViewStatus::Active))
    }

    pub fn view(&self, view_id: &str) -> BeliefResult<Option<DerivedView>> {
        self.views.get_view(view_id)
    }

    /// Flagged views paired with the belief each contradicts.
    ///
    /// Counterparts that have since left the active set (a view reached a
    /// terminal state, a concept was deprecated) are omitted; the next cycle
    /// clears those flags. Two views flagged against each other are reported
    /// once.
    pub fn flagged_conflicts(&self, user_id: &str) -> BeliefResult<Vec<FlaggedConflict>> {
        let mut flagged = Vec::new();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        for view in self.active_views(user_id)? {
            for conflict in &view.conflicts {
                if let ConflictCounterpart::View(other) = &conflict.counterpart {
                    let pair = if view.id <= *other {
                        (view.id.clone(), other.clone())
                    } else {
                        (other.clone(), view.id.clone())
                    };
                    if !seen_pairs.insert(pair) {
                        continue;
                    }
                }
                let counterpart = match &conflict.counterpart {
                    ConflictCounterpart::View(id) => self
                        .views
                        .get_view(id)?
                        .filter(DerivedView::is_active)
                        .map(FlaggedCounterpart::View),
                    ConflictCounterpart::Concept(id) => self
                        .registry
                        .get(id)?
                        .filter(StableConcept::is_current)
                        .map(FlaggedCounterpart::Concept),
                };
                match counterpart {
                    Some(counterpart) => flagged.push(FlaggedConflict {
                        view: view.clone(),
                        counterpart,
                        conflict: conflict.clone(),
                    }),
                    None => debug!(
                        view_id = %view.id,
                        counterpart = conflict.counterpart.id(),
                        "stale conflict skipped"
                    ),
                }
            }
        }
        Ok(flagged)
    }
}
