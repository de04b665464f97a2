//! # belief-core
//!
//! Foundation crate for the belief evolution engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod confidence;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use confidence::Confidence;
pub use config::BeliefConfig;
pub use errors::{BeliefError, BeliefResult};
pub use models::{
    DerivedView, DetectedPattern, Event, PatternType, StableConcept, TimeRange, ViewStatus,
    ViewType,
};
