use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DerivedView, ViewType};
use crate::constants::PROMOTION_GATE_SOURCE;

/// The belief a concept version asserts. Rollback copies this verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptContent {
    pub hypothesis: String,
    pub action: Option<String>,
    pub target: Option<String>,
    pub evidence_count: usize,
}

/// How a concept version came to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConceptOrigin {
    Promotion {
        view_id: String,
    },
    Rollback {
        target_version: u32,
        target_concept_id: String,
    },
}

/// A promoted, versioned belief.
///
/// Rows are never rewritten: a new version supersedes the current one and the
/// only mutation an existing row ever sees is deprecation or access tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StableConcept {
    pub concept_id: String,
    pub user_id: String,
    /// Stable machine key, unique among non-deprecated concepts per user.
    pub canonical_name: String,
    pub display_name: String,
    pub concept_type: ViewType,
    pub description: Option<String>,
    pub content: ConceptContent,
    pub version: u32,
    /// Version this one supersedes. `None` only for version 1.
    pub parent_concept_id: Option<String>,
    pub is_deprecated: bool,
    pub deprecated_at: Option<DateTime<Utc>>,
    pub deprecation_reason: Option<String>,
    pub promoted_from: String,
    pub promotion_confidence: f64,
    pub origin: ConceptOrigin,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl StableConcept {
    /// Canonical key for the concept a view would promote into,
    /// e.g. `habit:eat:apple`.
    pub fn canonical_name_for(view: &DerivedView) -> String {
        let subject = match (&view.action, &view.target) {
            (Some(action), Some(target)) => format!("{}:{}", normalize(action), normalize(target)),
            (None, Some(target)) => normalize(target),
            _ => normalize(&view.hypothesis),
        };
        format!("{}:{}", view.view_type, subject)
    }

    /// Version 1 of a new chain, promoted from `view`.
    pub fn first_version(view: &DerivedView, canonical_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            concept_id: new_concept_id(),
            user_id: view.user_id.clone(),
            canonical_name: canonical_name.to_string(),
            display_name: view.hypothesis.clone(),
            concept_type: view.view_type,
            description: view.description.clone(),
            content: ConceptContent {
                hypothesis: view.hypothesis.clone(),
                action: view.action.clone(),
                target: view.target.clone(),
                evidence_count: view.derived_from.len(),
            },
            version: 1,
            parent_concept_id: None,
            is_deprecated: false,
            deprecated_at: None,
            deprecation_reason: None,
            promoted_from: view.id.clone(),
            promotion_confidence: view.confidence.value(),
            origin: ConceptOrigin::Promotion {
                view_id: view.id.clone(),
            },
            source: PROMOTION_GATE_SOURCE.to_string(),
            created_at: now,
            access_count: 0,
            last_accessed_at: None,
        }
    }

    /// Next version of this chain, promoted from `view`.
    pub fn superseded_by_view(&self, view: &DerivedView, now: DateTime<Utc>) -> Self {
        let mut next = Self::first_version(view, &self.canonical_name, now);
        next.version = self.version + 1;
        next.parent_concept_id = Some(self.concept_id.clone());
        next
    }

    /// Next version of this chain carrying `target`'s content.
    /// `self` is the head of the chain being superseded.
    pub fn rollback_successor(&self, target: &StableConcept, now: DateTime<Utc>) -> Self {
        Self {
            concept_id: new_concept_id(),
            user_id: self.user_id.clone(),
            canonical_name: self.canonical_name.clone(),
            display_name: target.display_name.clone(),
            concept_type: target.concept_type,
            description: target.description.clone(),
            content: target.content.clone(),
            version: self.version + 1,
            parent_concept_id: Some(self.concept_id.clone()),
            is_deprecated: false,
            deprecated_at: None,
            deprecation_reason: None,
            promoted_from: target.promoted_from.clone(),
            promotion_confidence: target.promotion_confidence,
            origin: ConceptOrigin::Rollback {
                target_version: target.version,
                target_concept_id: target.concept_id.clone(),
            },
            source: format!("rollback_from_v{}", self.version),
            created_at: now,
            access_count: 0,
            last_accessed_at: None,
        }
    }

    pub fn is_current(&self) -> bool {
        !self.is_deprecated
    }

    /// Whether `view` asserts exactly what this concept already holds: same
    /// user, same chain and the same hypothesis text.
    pub fn restated_by(&self, view: &DerivedView) -> bool {
        self.user_id == view.user_id
            && self.canonical_name == Self::canonical_name_for(view)
            && normalize(&self.content.hypothesis) == normalize(&view.hypothesis)
    }

    pub fn version_string(&self) -> String {
        format!("v{}", self.version)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {} - {}",
            self.canonical_name,
            self.version_string(),
            self.display_name,
            if self.is_current() { "current" } else { "deprecated" }
        )
    }
}

/// Result of a deprecation request. Re-deprecating is a no-op, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "concept", rename_all = "snake_case")]
pub enum DeprecationOutcome {
    Deprecated(StableConcept),
    AlreadyDeprecated(StableConcept),
}

impl DeprecationOutcome {
    pub fn concept(&self) -> &StableConcept {
        match self {
            Self::Deprecated(c) | Self::AlreadyDeprecated(c) => c,
        }
    }

    pub fn was_noop(&self) -> bool {
        matches!(self, Self::AlreadyDeprecated(_))
    }
}

fn new_concept_id() -> String {
    format!("concept_{}", uuid::Uuid::new_v4().simple())
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
