//! Test fixture loader and event builders for the belief workspace.
//!
//! Scenario files live under `crates/test-fixtures/scenarios/` and deserialize
//! into [`Scenario`]. Builders produce synthetic event streams for unit tests.

use std::path::PathBuf;

use belief_core::Event;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Root directory of the fixtures crate.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("scenarios").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// A recorded event stream with the cycle time it should be evaluated at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub user_id: String,
    pub now: DateTime<Utc>,
    pub events: Vec<Event>,
    #[serde(default)]
    pub expected: serde_json::Value,
}

/// Load `scenarios/<name>.json`.
pub fn load_scenario(name: &str) -> Scenario {
    load_fixture(&format!("scenarios/{name}.json"))
}

/// Fluent builder for a single event.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn new(id: &str, user_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            event: Event {
                id: id.to_string(),
                user_id: user_id.to_string(),
                timestamp,
                actor: Some(user_id.to_string()),
                action: "eat".to_string(),
                target: "apple".to_string(),
                quantity: None,
                unit: None,
                confidence: 0.9,
            },
        }
    }

    pub fn action(mut self, action: &str) -> Self {
        self.event.action = action.to_string();
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.event.target = target.to_string();
        self
    }

    pub fn quantity(mut self, quantity: f64, unit: &str) -> Self {
        self.event.quantity = Some(quantity);
        self.event.unit = Some(unit.to_string());
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.event.confidence = confidence;
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}

/// `count` events of `(action, target)`, one every `every_hours`, starting at `start`.
/// Ids are `{prefix}{index}`.
pub fn spaced_events(
    user_id: &str,
    action: &str,
    target: &str,
    start: DateTime<Utc>,
    count: usize,
    every_hours: i64,
    prefix: &str,
) -> Vec<Event> {
    (0..count)
        .map(|i| {
            EventBuilder::new(
                &format!("{prefix}{i}"),
                user_id,
                start + Duration::hours(every_hours * i as i64),
            )
            .action(action)
            .target(target)
            .build()
        })
        .collect()
}

/// One event per day for `days` days.
pub fn daily_events(
    user_id: &str,
    action: &str,
    target: &str,
    start: DateTime<Utc>,
    days: usize,
) -> Vec<Event> {
    spaced_events(user_id, action, target, start, days, 24, &format!("{action}-{target}-"))
}

/// One event on each day in `[start, start + days)` whose weekday
/// (0 = Monday) is in `weekdays`.
pub fn events_on_weekdays(
    user_id: &str,
    action: &str,
    target: &str,
    start: DateTime<Utc>,
    days: i64,
    weekdays: &[u32],
) -> Vec<Event> {
    (0..days)
        .map(|d| start + Duration::days(d))
        .filter(|ts| weekdays.contains(&ts.weekday().num_days_from_monday()))
        .enumerate()
        .map(|(i, ts)| {
            EventBuilder::new(&format!("{action}-{target}-wd{i}"), user_id, ts)
                .action(action)
                .target(target)
                .build()
        })
        .collect()
}

/// Parse an RFC 3339 timestamp, panicking on bad input.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap_or_else(|e| panic!("bad timestamp {s}: {e}"))
        .with_timezone(&Utc)
}
