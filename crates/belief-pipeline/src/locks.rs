//! Per-view write locks.
//!
//! Gate evaluation and counter-evidence recording both mutate a view; each
//! holds the view's lock for its whole read-modify-write.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use belief_core::errors::{BeliefError, BeliefResult};

#[derive(Debug, Default)]
pub struct ViewLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ViewLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `view_id`.
    pub fn with_view<T>(
        &self,
        view_id: &str,
        f: impl FnOnce() -> BeliefResult<T>,
    ) -> BeliefResult<T> {
        // Clone the handle out so the map shard is not held while waiting.
        let lock = self
            .locks
            .entry(view_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().map_err(|_| {
            BeliefError::ConcurrencyError(format!("lock for view {view_id} poisoned"))
        })?;
        f()
    }

    /// Drop locks nobody is holding or waiting on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
