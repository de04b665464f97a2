//! # belief-storage
//!
//! Persistence for the belief engine.
//!
//! - [`StorageEngine`]: SQLite-backed, single write connection in WAL mode,
//!   schema managed by versioned migrations.
//! - [`InMemoryStore`]: arena-backed store with the same contracts, for
//!   tests and embedded use.
//!
//! Both implement `IEventSource`, `IViewStorage` and `IConceptStorage`.

pub mod engine;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use memory::InMemoryStore;

use belief_core::errors::{BeliefError, StorageError};

/// Wrap a low-level failure as a storage error.
pub fn to_storage_err(message: impl Into<String>) -> BeliefError {
    BeliefError::StorageError(StorageError::SqliteError {
        message: message.into(),
    })
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
pub(crate) fn ts_to_sql(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
