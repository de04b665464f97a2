use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::conflict::Conflict;
use super::pattern::PatternType;
use crate::confidence::Confidence;
use crate::constants::PATTERN_DETECTOR_SOURCE;
use crate::errors::{BeliefError, BeliefResult};

/// Lifecycle of a derived view. Expired, promoted and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Active,
    Expired,
    Promoted,
    Rejected,
}

impl ViewStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Promoted => "promoted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            "promoted" => Some(Self::Promoted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ViewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of claim a view makes. Fixed mapping from `PatternType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Habit,
    Trend,
    Anomaly,
    Routine,
}

impl ViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Habit => "habit",
            Self::Trend => "trend",
            Self::Anomaly => "anomaly",
            Self::Routine => "routine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "habit" => Some(Self::Habit),
            "trend" => Some(Self::Trend),
            "anomaly" => Some(Self::Anomaly),
            "routine" => Some(Self::Routine),
            _ => None,
        }
    }
}

impl From<PatternType> for ViewType {
    fn from(pt: PatternType) -> Self {
        match pt {
            PatternType::HighFrequency => Self::Habit,
            PatternType::Trend => Self::Trend,
            PatternType::Anomaly => Self::Anomaly,
            PatternType::Temporal => Self::Routine,
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provisional, falsifiable hypothesis inferred from a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    pub id: String,
    pub user_id: String,
    pub hypothesis: String,
    pub view_type: ViewType,
    pub description: Option<String>,
    /// Structured subject of the hypothesis, when known.
    pub action: Option<String>,
    pub target: Option<String>,
    /// Supporting evidence. Append-only, no duplicates.
    pub derived_from: Vec<String>,
    pub confidence: Confidence,
    pub validated_count: u32,
    /// Contradicting evidence. Append-only, no duplicates.
    pub counter_evidence: Vec<String>,
    pub first_evidence_at: DateTime<Utc>,
    pub last_evidence_at: DateTime<Utc>,
    pub status: ViewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_validated_at: Option<DateTime<Utc>>,
    /// Concept id this view was promoted into.
    pub promoted_to: Option<String>,
    pub source: String,
    /// Unresolved conflicts found on the latest cycle. Non-empty means flagged.
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

impl DerivedView {
    /// Default lifetime before re-validation is required.
    pub const DEFAULT_LIFETIME_DAYS: i64 = 30;

    /// Create an active view with default confidence and a 30-day lifetime.
    pub fn new(
        user_id: impl Into<String>,
        hypothesis: impl Into<String>,
        view_type: ViewType,
        derived_from: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut evidence = Vec::with_capacity(derived_from.len());
        for id in derived_from {
            if !evidence.contains(&id) {
                evidence.push(id);
            }
        }
        Self {
            id: format!("view_{}", uuid::Uuid::new_v4().simple()),
            user_id: user_id.into(),
            hypothesis: hypothesis.into(),
            view_type,
            description: None,
            action: None,
            target: None,
            derived_from: evidence,
            confidence: Confidence::default(),
            validated_count: 0,
            counter_evidence: Vec::new(),
            first_evidence_at: now,
            last_evidence_at: now,
            status: ViewStatus::Active,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(Self::DEFAULT_LIFETIME_DAYS),
            last_validated_at: None,
            promoted_to: None,
            source: PATTERN_DETECTOR_SOURCE.to_string(),
            conflicts: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_confidence(mut self, confidence: impl Into<Confidence>) -> Self {
        self.confidence = confidence.into();
        self
    }

    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_subject(mut self, action: &str, target: &str) -> Self {
        self.action = Some(action.to_string());
        self.target = Some(target.to_string());
        self
    }

    pub fn with_evidence_span(mut self, first: DateTime<Utc>, last: DateTime<Utc>) -> Self {
        self.first_evidence_at = first.min(last);
        self.last_evidence_at = first.max(last);
        self
    }

    pub fn with_validated_count(mut self, count: u32) -> Self {
        self.validated_count = count;
        self
    }

    pub fn with_counter_evidence(mut self, ids: Vec<String>) -> Self {
        self.add_counter_evidence(ids);
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Key under which re-detections of the same hypothesis are merged.
    pub fn hypothesis_key(&self) -> String {
        Self::key_for(&self.user_id, self.view_type, &self.hypothesis)
    }

    pub fn key_for(user_id: &str, view_type: ViewType, hypothesis: &str) -> String {
        let normalized = hypothesis
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        format!("{user_id}|{view_type}|{normalized}")
    }

    /// Duration between first and most recent supporting evidence.
    pub fn time_span(&self) -> Duration {
        self.last_evidence_at - self.first_evidence_at
    }

    /// `|counter| / (|supporting| + |counter|)`, 0 when there is no evidence at all.
    pub fn counter_evidence_ratio(&self) -> f64 {
        let counter = self.counter_evidence.len() as f64;
        let total = self.derived_from.len() as f64 + counter;
        if total == 0.0 {
            return 0.0;
        }
        counter / total
    }

    pub fn is_active(&self) -> bool {
        self.status == ViewStatus::Active
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_flagged(&self) -> bool {
        self.is_active() && !self.conflicts.is_empty()
    }

    /// Append supporting evidence, skipping ids already present.
    /// Returns how many ids were new.
    pub fn append_evidence<I: IntoIterator<Item = String>>(&mut self, ids: I) -> usize {
        append_unique(&mut self.derived_from, ids)
    }

    /// Append contradicting evidence, skipping ids already present.
    /// Returns how many ids were new.
    pub fn add_counter_evidence<I: IntoIterator<Item = String>>(&mut self, ids: I) -> usize {
        append_unique(&mut self.counter_evidence, ids)
    }

    /// Move to a terminal state. Only `Active` may transition.
    pub fn transition(&mut self, to: ViewStatus, now: DateTime<Utc>) -> BeliefResult<()> {
        if self.status.is_terminal() || to == ViewStatus::Active {
            return Err(BeliefError::InvalidTransition {
                view_id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = now;
        self.conflicts.clear();
        Ok(())
    }
}

fn append_unique<I: IntoIterator<Item = String>>(target: &mut Vec<String>, ids: I) -> usize {
    let mut added = 0;
    for id in ids {
        if !target.contains(&id) {
            target.push(id);
            added += 1;
        }
    }
    added
}
