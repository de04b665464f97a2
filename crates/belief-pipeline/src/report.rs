//! What a cycle or a batch did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use belief_core::models::TimeRange;
use belief_observability::MetricsSnapshot;

/// Outcome of one user's cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub user_id: String,
    pub window: Option<TimeRange>,
    pub events_analyzed: usize,
    pub patterns_detected: usize,
    pub views_created: Vec<String>,
    pub views_reconfirmed: Vec<String>,
    /// Current concepts a pattern restated; no view is created for those.
    pub concepts_reconfirmed: Vec<String>,
    /// `(view_id, concept_id)` for every promotion.
    pub promoted: Vec<(String, String)>,
    pub rejected: Vec<String>,
    pub expired: Vec<String>,
    /// Views held because they contradict another belief.
    pub flagged: Vec<String>,
    /// `(view_id, error)` for promotions that failed closed.
    pub gate_errors: Vec<(String, String)>,
}

impl CycleReport {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    pub fn concept_for(&self, view_id: &str) -> Option<&str> {
        self.promoted
            .iter()
            .find(|(v, _)| v == view_id)
            .map(|(_, c)| c.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UserOutcome {
    Completed(CycleReport),
    Failed { error_code: String, message: String },
    TimedOut { timeout_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    pub user_id: String,
    pub outcome: UserOutcome,
}

/// Per-user results of a batch, ordered by user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub results: Vec<UserResult>,
    pub metrics: MetricsSnapshot,
}

impl BatchReport {
    pub fn get(&self, user_id: &str) -> Option<&UserOutcome> {
        self.results
            .iter()
            .find(|r| r.user_id == user_id)
            .map(|r| &r.outcome)
    }

    pub fn completed(&self) -> impl Iterator<Item = &CycleReport> {
        self.results.iter().filter_map(|r| match &r.outcome {
            UserOutcome::Completed(report) => Some(report),
            _ => None,
        })
    }

    pub fn failed_users(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, UserOutcome::Failed { .. }))
            .map(|r| r.user_id.as_str())
            .collect()
    }

    pub fn timed_out_users(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, UserOutcome::TimedOut { .. }))
            .map(|r| r.user_id.as_str())
            .collect()
    }
}
