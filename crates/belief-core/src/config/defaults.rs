// Single source of truth for all default values.

// --- Detection ---
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
pub const DEFAULT_MIN_OCCURRENCES: usize = 3;
pub const DEFAULT_MIN_FREQUENCY_PER_DAY: f64 = 0.5; // once every 2 days
pub const DEFAULT_MIN_CONSISTENCY: f64 = 0.5;
pub const DEFAULT_MIN_TREND_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_MIN_TREND_CHANGE: f64 = 0.5;
pub const DEFAULT_ANOMALY_BASELINE_DAYS: i64 = 30;
pub const DEFAULT_MIN_ANOMALY_DEVIATION: f64 = 0.5;
pub const DEFAULT_MIN_BASELINE_PER_DAY: f64 = 0.1;
pub const DEFAULT_TEMPORAL_MIN_OCCURRENCES: usize = 4;
pub const DEFAULT_TEMPORAL_MIN_LIFT: f64 = 2.0;
pub const DEFAULT_TEMPORAL_MIN_WEEKS: u32 = 2;

// --- Views ---
pub const DEFAULT_VIEW_EXPIRATION_DAYS: i64 = 30;
pub const DEFAULT_HIGH_FREQUENCY_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_TREND_MULTIPLIER: f64 = 0.9;
pub const DEFAULT_ANOMALY_MULTIPLIER: f64 = 0.8;
pub const DEFAULT_TEMPORAL_MULTIPLIER: f64 = 1.1;
pub const DEFAULT_MIN_VIEW_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_TIMESPAN_REFERENCE_DAYS: f64 = 30.0;

// --- Gate ---
pub const DEFAULT_PROMOTION_CONFIDENCE: f64 = 0.85;
pub const DEFAULT_PROMOTION_TIME_SPAN_DAYS: i64 = 30;
pub const DEFAULT_PROMOTION_VALIDATED_COUNT: u32 = 3;
pub const DEFAULT_MAX_COUNTER_EVIDENCE_RATIO: f64 = 0.15;
pub const DEFAULT_REJECT_COUNTER_EVIDENCE_RATIO: f64 = 0.30;

// --- Scheduler ---
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_CONCURRENT_USERS: usize = 4;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "belief.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "belief=info";
pub const DEFAULT_JSON_LOGS: bool = false;
