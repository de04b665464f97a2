use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimeRange;

/// A structured, immutable record of an observed action.
///
/// Produced upstream by the ingestion layer; read-only to this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
    pub action: String,
    pub target: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    /// Extraction confidence in [0.0, 1.0].
    pub confidence: f64,
}

impl Event {
    /// Grouping key used by every pattern family.
    pub fn key(&self) -> (&str, &str) {
        (self.action.as_str(), self.target.as_str())
    }

    /// Returns a description of the first structural problem, if any.
    pub fn validation_problem(&self) -> Option<String> {
        if self.id.trim().is_empty() {
            return Some("event has an empty id".to_string());
        }
        if self.action.trim().is_empty() || self.target.trim().is_empty() {
            return Some(format!("event {} is missing action or target", self.id));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Some(format!(
                "event {} has confidence {} outside [0, 1]",
                self.id, self.confidence
            ));
        }
        if let Some(q) = self.quantity {
            if !q.is_finite() {
                return Some(format!("event {} has a non-finite quantity", self.id));
            }
        }
        None
    }
}

/// Filter for `IEventSource::query_events`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub user_id: String,
    pub action: Option<String>,
    pub target: Option<String>,
    pub range: TimeRange,
}

impl EventQuery {
    pub fn for_user(user_id: impl Into<String>, range: TimeRange) -> Self {
        Self {
            user_id: user_id.into(),
            action: None,
            target: None,
            range,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Whether an event satisfies this query.
    pub fn matches(&self, event: &Event) -> bool {
        event.user_id == self.user_id
            && self.range.contains(event.timestamp)
            && self.action.as_deref().map_or(true, |a| a == event.action)
            && self.target.as_deref().map_or(true, |t| t == event.target)
    }
}
