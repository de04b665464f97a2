//! Span definitions per pipeline stage.

/// Per-user detection pass.
#[macro_export]
macro_rules! detection_span {
    ($user_id:expr) => {
        tracing::info_span!("belief.detection", user_id = %$user_id)
    };
}

/// Gate evaluation of one view.
#[macro_export]
macro_rules! gate_span {
    ($view_id:expr) => {
        tracing::debug_span!("belief.gate", view_id = %$view_id)
    };
}

/// Registry promotion into one canonical name.
#[macro_export]
macro_rules! promotion_span {
    ($canonical_name:expr) => {
        tracing::info_span!("belief.promotion", canonical_name = %$canonical_name)
    };
}

/// Whole batch across users.
#[macro_export]
macro_rules! batch_span {
    ($user_count:expr) => {
        tracing::info_span!("belief.batch", user_count = $user_count)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const DETECTION: &str = "belief.detection";
    pub const GATE: &str = "belief.gate";
    pub const PROMOTION: &str = "belief.promotion";
    pub const BATCH: &str = "belief.batch";
}
