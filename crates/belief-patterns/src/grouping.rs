//! Grouping of events by `(action, target)`.

use std::collections::BTreeMap;

use belief_core::{Event, TimeRange};

/// Events keyed by `(action, target)`, each group in timestamp order.
/// Ordered map so every family iterates keys deterministically.
pub type EventGroups<'a> = BTreeMap<(&'a str, &'a str), Vec<&'a Event>>;

/// Group `events` (already sorted by timestamp) whose timestamp satisfies `keep`.
pub fn group_by_key<'a, F>(events: &'a [Event], keep: F) -> EventGroups<'a>
where
    F: Fn(&Event) -> bool,
{
    let mut groups: EventGroups<'a> = BTreeMap::new();
    for event in events.iter().filter(|e| keep(e)) {
        groups.entry(event.key()).or_default().push(event);
    }
    groups
}

/// Events inside the closed detection window.
pub fn in_window<'a>(events: &'a [Event], window: &TimeRange) -> EventGroups<'a> {
    group_by_key(events, |e| window.contains(e.timestamp))
}

/// Events in `[baseline.start, baseline.end)`. The end is excluded so an event
/// sitting exactly on the window start is counted once, in the window.
pub fn in_baseline<'a>(events: &'a [Event], baseline: &TimeRange) -> EventGroups<'a> {
    group_by_key(events, |e| {
        e.timestamp >= baseline.start && e.timestamp < baseline.end
    })
}

pub fn ids(events: &[&Event]) -> Vec<String> {
    events.iter().map(|e| e.id.clone()).collect()
}
