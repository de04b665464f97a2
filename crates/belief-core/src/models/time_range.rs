use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Closed time window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days` days ending at `now`.
    pub fn last_n_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length in fractional days.
    pub fn days(&self) -> f64 {
        self.duration().num_seconds() as f64 / 86_400.0
    }

    /// Split into two equal halves. Callers assign the midpoint to the second half.
    pub fn halves(&self) -> (TimeRange, TimeRange) {
        let mid = self.start + self.duration() / 2;
        (
            TimeRange::new(self.start, mid),
            TimeRange::new(mid, self.end),
        )
    }

    /// The `days` days immediately preceding this window; its end equals our start.
    pub fn preceding(&self, days: i64) -> TimeRange {
        TimeRange::new(self.start - Duration::days(days), self.start)
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &TimeRange) -> TimeRange {
        TimeRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}
