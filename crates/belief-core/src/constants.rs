/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source tag stamped on views produced from detected patterns.
pub const PATTERN_DETECTOR_SOURCE: &str = "pattern_detector";

/// Source tag stamped on concepts produced by the promotion gate.
pub const PROMOTION_GATE_SOURCE: &str = "promotion_gate";

/// Hard lower bound on a view's lifetime, in days.
pub const MIN_VIEW_LIFETIME_DAYS: i64 = 15;

/// Hard upper bound on a view's lifetime, in days.
pub const MAX_VIEW_LIFETIME_DAYS: i64 = 60;

/// Day names indexed by `num_days_from_monday`.
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// `"Mon, Thu"` for `[0, 3]`. Out-of-range days are skipped.
pub fn weekday_list(weekdays: &[u32]) -> String {
    weekdays
        .iter()
        .filter_map(|d| WEEKDAY_NAMES.get(*d as usize).copied())
        .collect::<Vec<_>>()
        .join(", ")
}
