//! Single write connection behind a tokio Mutex.
//!
//! SQLite allows one writer at a time; serializing here keeps every
//! multi-statement commit (version append + deprecation) free of
//! SQLITE_BUSY retries.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use belief_core::errors::BeliefResult;

use super::pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a write connection to a file-backed database.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> BeliefResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        pragmas::apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory write connection.
    pub fn open_in_memory() -> BeliefResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        pragmas::apply_pragmas(&conn, 0)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the write connection.
    pub async fn with_conn<F, T>(&self, f: F) -> BeliefResult<T>
    where
        F: FnOnce(&Connection) -> BeliefResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Blocking variant. Must not be called from inside an async task;
    /// async callers go through `spawn_blocking` or [`Self::with_conn`].
    pub fn with_conn_sync<F, T>(&self, f: F) -> BeliefResult<T>
    where
        F: FnOnce(&Connection) -> BeliefResult<T>,
    {
        let guard = self.conn.blocking_lock();
        f(&guard)
    }
}
