//! # belief-views
//!
//! Turns detected patterns into derived views: falsifiable hypotheses with a
//! reproducible confidence and a bounded lifetime. Never touches concepts.

pub mod builder;
pub mod expiration;
pub mod factors;
pub mod formula;
pub mod generator;
pub mod hypothesis;

pub use builder::ViewGeneratorBuilder;
pub use formula::ConfidenceBreakdown;
pub use generator::{Reconfirmation, ViewGenerator};
