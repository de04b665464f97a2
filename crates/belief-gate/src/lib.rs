//! # belief-gate
//!
//! Decides what happens to a derived view on each cycle: promote it into the
//! concept registry, reject it, let it expire, or keep observing. Views that
//! contradict another active view or a current concept are held and flagged.

pub mod conflict;
pub mod criteria;
pub mod gate;

pub use conflict::ConflictDetector;
pub use criteria::GateCriterion;
pub use gate::{GateDecision, GateOutcome, PromotionGate};
