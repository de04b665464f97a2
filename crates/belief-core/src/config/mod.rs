pub mod belief_config;
pub mod defaults;
pub mod detection_config;
pub mod gate_config;
pub mod observability_config;
pub mod scheduler_config;
pub mod storage_config;
pub mod view_config;

pub use belief_config::BeliefConfig;
pub use detection_config::DetectionConfig;
pub use gate_config::GateConfig;
pub use observability_config::ObservabilityConfig;
pub use scheduler_config::SchedulerConfig;
pub use storage_config::StorageConfig;
pub use view_config::ViewConfig;
