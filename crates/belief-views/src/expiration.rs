use belief_core::constants::{MAX_VIEW_LIFETIME_DAYS, MIN_VIEW_LIFETIME_DAYS};
use belief_core::Confidence;
use chrono::{DateTime, Duration, Utc};

/// Lifetime in days: `base × (0.5 + 1.5 × confidence)`, clamped to [15, 60].
///
/// With the default base of 30 days, confidence 0 lives 15 days and
/// confidence 1 lives 60.
pub fn lifetime_days(confidence: Confidence, base_days: i64) -> f64 {
    let days = base_days as f64 * (0.5 + 1.5 * confidence.value());
    days.clamp(MIN_VIEW_LIFETIME_DAYS as f64, MAX_VIEW_LIFETIME_DAYS as f64)
}

/// Expiry for a view created at `created_at`.
pub fn expires_at(created_at: DateTime<Utc>, confidence: Confidence, base_days: i64) -> DateTime<Utc> {
    let seconds = (lifetime_days(confidence, base_days) * 86_400.0).round() as i64;
    created_at + Duration::seconds(seconds)
}

/// Pull a caller-chosen expiry back into the allowed lifetime range.
pub fn clamp_expiry(created_at: DateTime<Utc>, requested: DateTime<Utc>) -> DateTime<Utc> {
    let min = created_at + Duration::days(MIN_VIEW_LIFETIME_DAYS);
    let max = created_at + Duration::days(MAX_VIEW_LIFETIME_DAYS);
    requested.clamp(min, max)
}
