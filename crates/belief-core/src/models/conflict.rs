use serde::{Deserialize, Serialize};

use super::{DerivedView, StableConcept};

/// Two qualifiers on opposite sides of a belief ("often" / "rarely").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AntonymPair {
    pub positive: String,
    pub negative: String,
}

impl AntonymPair {
    pub fn new(positive: &str, negative: &str) -> Self {
        Self {
            positive: positive.to_string(),
            negative: negative.to_string(),
        }
    }
}

/// The other side of a conflict, by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConflictCounterpart {
    View(String),
    Concept(String),
}

impl ConflictCounterpart {
    pub fn id(&self) -> &str {
        match self {
            Self::View(id) | Self::Concept(id) => id,
        }
    }
}

/// Semantic opposition between a candidate view and another belief about the same target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub view_id: String,
    pub counterpart: ConflictCounterpart,
    /// Normalized target both beliefs refer to.
    pub target: String,
    pub pair: AntonymPair,
    pub description: String,
}

/// Resolved form of a conflict handed to reviewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FlaggedCounterpart {
    View(DerivedView),
    Concept(StableConcept),
}

/// A flagged view together with the belief it contradicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedConflict {
    pub view: DerivedView,
    pub counterpart: FlaggedCounterpart,
    pub conflict: Conflict,
}
