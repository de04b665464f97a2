use serde::{Deserialize, Serialize};

use super::defaults;

/// Batch scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Per-user cycle deadline. A cycle past it is cancelled and logged.
    pub batch_timeout_ms: u64,
    pub max_concurrent_users: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_timeout_ms: defaults::DEFAULT_BATCH_TIMEOUT_MS,
            max_concurrent_users: defaults::DEFAULT_MAX_CONCURRENT_USERS,
        }
    }
}
