use super::error_code::{self, ErrorCode};
use super::{ConfigError, StorageError};
use crate::models::ViewStatus;

/// Top-level error for the belief engine.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum BeliefError {
    /// Malformed or missing event batch. The affected user's cycle is skipped.
    #[error("invalid input for user {user_id}: {reason}")]
    InputError { user_id: String, reason: String },

    #[error("derived view not found: {id}")]
    ViewNotFound { id: String },

    #[error("stable concept not found: {id}")]
    ConceptNotFound { id: String },

    #[error("version {version} not found in chain for {canonical_name}")]
    VersionNotFound { canonical_name: String, version: u32 },

    #[error("view {view_id} cannot transition from {from} to {to}")]
    InvalidTransition {
        view_id: String,
        from: ViewStatus,
        to: ViewStatus,
    },

    /// Storage failed during an atomic promotion. Nothing was committed.
    #[error("gate evaluation failed for view {view_id}: {reason}")]
    GateEvaluationError { view_id: String, reason: String },

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("cycle cancelled for user {user_id}")]
    Cancelled { user_id: String },

    #[error("cycle for user {user_id} exceeded {timeout_ms}ms")]
    TimedOut { user_id: String, timeout_ms: u64 },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ErrorCode for BeliefError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InputError { .. } => error_code::INPUT_ERROR,
            Self::ViewNotFound { .. }
            | Self::ConceptNotFound { .. }
            | Self::VersionNotFound { .. } => error_code::NOT_FOUND,
            Self::InvalidTransition { .. } => error_code::INVALID_TRANSITION,
            Self::GateEvaluationError { .. } => error_code::GATE_EVALUATION_ERROR,
            Self::ConcurrencyError(_) => error_code::CONCURRENCY_ERROR,
            Self::Cancelled { .. } => error_code::CANCELLED,
            Self::TimedOut { .. } => error_code::TIMED_OUT,
            Self::StorageError(e) => e.error_code(),
            Self::ConfigError(e) => e.error_code(),
            Self::SerializationError(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}

/// Convenience alias used across the workspace.
pub type BeliefResult<T> = Result<T, BeliefError>;
