//! Tracing setup: `BELIEF_LOG`-filtered fmt or JSON subscriber.
//!
//! Every initializer is safe to call more than once; only the first call
//! installs a subscriber.

pub mod events;
pub mod spans;

use std::sync::Once;

use belief_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "BELIEF_LOG";

static INIT: Once = Once::new();

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Human-readable output, filtered by `BELIEF_LOG` (default `belief=info`).
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(belief_core::config::defaults::DEFAULT_LOG_FILTER))
            .with_target(true)
            .try_init();
    });
}

/// JSON output for service deployments.
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(belief_core::config::defaults::DEFAULT_LOG_FILTER))
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .try_init();
    });
}

/// Install the subscriber `config` describes. `BELIEF_LOG` still wins over
/// `config.log_filter` when set.
pub fn init_from_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = env_filter(&config.log_filter);
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true);
        let _ = if config.json_logs {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}
