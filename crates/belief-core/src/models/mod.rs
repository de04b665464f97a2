//! Data model: events in, patterns and views in flight, concepts out.

pub mod concept;
pub mod conflict;
pub mod event;
pub mod pattern;
pub mod time_range;
pub mod view;

pub use concept::{ConceptContent, ConceptOrigin, DeprecationOutcome, StableConcept};
pub use conflict::{
    AntonymPair, Conflict, ConflictCounterpart, FlaggedConflict, FlaggedCounterpart,
};
pub use event::{Event, EventQuery};
pub use pattern::{
    DetectedPattern, PatternDetectionResult, PatternMetadata, PatternType, TrendDirection,
};
pub use time_range::TimeRange;
pub use view::{DerivedView, ViewStatus, ViewType};
