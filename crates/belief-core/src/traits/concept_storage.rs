use chrono::{DateTime, Utc};

use crate::errors::BeliefResult;
use crate::models::{DeprecationOutcome, StableConcept};

/// Append-only persistence for version-chained concepts.
///
/// Implementations must keep at most one non-deprecated row per
/// `(user_id, canonical_name)` at every commit point.
pub trait IConceptStorage: Send + Sync {
    /// Insert `concept` and, in the same transaction, deprecate `supersedes`.
    ///
    /// With `supersedes = None` the chain must have no current version.
    /// With `supersedes = Some(id)` that id must be the chain's current version.
    /// Violations fail with `ConcurrencyError` and commit nothing.
    fn append_version(
        &self,
        concept: &StableConcept,
        supersedes: Option<&str>,
        at: DateTime<Utc>,
    ) -> BeliefResult<()>;

    fn get_concept(&self, concept_id: &str) -> BeliefResult<Option<StableConcept>>;

    fn current_concept(
        &self,
        user_id: &str,
        canonical_name: &str,
    ) -> BeliefResult<Option<StableConcept>>;

    /// Every version of a chain, ascending by version.
    fn concept_chain(&self, user_id: &str, canonical_name: &str)
        -> BeliefResult<Vec<StableConcept>>;

    /// Non-deprecated concepts of a user.
    fn current_concepts(&self, user_id: &str) -> BeliefResult<Vec<StableConcept>>;

    fn deprecate_concept(
        &self,
        concept_id: &str,
        at: DateTime<Utc>,
        reason: Option<&str>,
    ) -> BeliefResult<DeprecationOutcome>;

    fn record_access(&self, concept_id: &str, at: DateTime<Utc>) -> BeliefResult<()>;
}
