//! Error handling for the belief engine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod belief_error;
pub mod config_error;
pub mod error_code;
pub mod storage_error;

pub use belief_error::{BeliefError, BeliefResult};
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use storage_error::StorageError;
