//! One detection module per pattern family.

pub mod anomaly;
pub mod high_frequency;
pub mod temporal;
pub mod trend;

use belief_core::config::DetectionConfig;
use belief_core::{Event, TimeRange};

use crate::grouping::EventGroups;

/// Everything a family needs from one detector run. Built once per run so all
/// four families read the same snapshot.
pub struct DetectionInput<'a> {
    pub user_id: &'a str,
    pub window: TimeRange,
    pub baseline: TimeRange,
    pub current: EventGroups<'a>,
    pub previous: EventGroups<'a>,
    pub config: &'a DetectionConfig,
}

/// First and last timestamp of a non-empty, timestamp-ordered group.
pub(crate) fn bounds(events: &[&Event]) -> Option<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> {
    Some((events.first()?.timestamp, events.last()?.timestamp))
}
