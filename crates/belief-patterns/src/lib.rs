//! # belief-patterns
//!
//! Scans one user's events inside a bounded window and reports statistically
//! supported patterns. Four families, one module each, dispatched exhaustively
//! over [`PatternType`](belief_core::PatternType).

pub mod consistency;
pub mod detector;
pub mod families;
pub mod grouping;

pub use detector::PatternDetector;
