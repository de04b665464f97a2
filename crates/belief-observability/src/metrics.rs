//! Counters shared by concurrent user cycles.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    cycles_completed: AtomicU64,
    cycles_failed: AtomicU64,
    cycles_timed_out: AtomicU64,
    patterns_detected: AtomicU64,
    views_created: AtomicU64,
    views_reconfirmed: AtomicU64,
    views_promoted: AtomicU64,
    views_rejected: AtomicU64,
    views_expired: AtomicU64,
    conflicts_flagged: AtomicU64,
}

/// Point-in-time copy of [`PipelineMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub cycles_timed_out: u64,
    pub patterns_detected: u64,
    pub views_created: u64,
    pub views_reconfirmed: u64,
    pub views_promoted: u64,
    pub views_rejected: u64,
    pub views_expired: u64,
    pub conflicts_flagged: u64,
}

macro_rules! counter {
    ($add:ident, $field:ident) => {
        pub fn $add(&self, n: u64) {
            self.$field.fetch_add(n, Ordering::Relaxed);
        }
    };
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    counter!(add_cycles_completed, cycles_completed);
    counter!(add_cycles_failed, cycles_failed);
    counter!(add_cycles_timed_out, cycles_timed_out);
    counter!(add_patterns_detected, patterns_detected);
    counter!(add_views_created, views_created);
    counter!(add_views_reconfirmed, views_reconfirmed);
    counter!(add_views_promoted, views_promoted);
    counter!(add_views_rejected, views_rejected);
    counter!(add_views_expired, views_expired);
    counter!(add_conflicts_flagged, conflicts_flagged);

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
            cycles_timed_out: self.cycles_timed_out.load(Ordering::Relaxed),
            patterns_detected: self.patterns_detected.load(Ordering::Relaxed),
            views_created: self.views_created.load(Ordering::Relaxed),
            views_reconfirmed: self.views_reconfirmed.load(Ordering::Relaxed),
            views_promoted: self.views_promoted.load(Ordering::Relaxed),
            views_rejected: self.views_rejected.load(Ordering::Relaxed),
            views_expired: self.views_expired.load(Ordering::Relaxed),
            conflicts_flagged: self.conflicts_flagged.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
