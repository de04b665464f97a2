//! # belief-pipeline
//!
//! Wires detector, generator, gate and registry into one per-user cycle,
//! and runs that cycle across many users.
//!
//! - [`BeliefPipeline::run_user`]: one deterministic cycle over a single
//!   snapshot of a user's events, views and concepts.
//! - [`CounterEvidenceRecorder`]: incremental counter-evidence, serialized
//!   with gate evaluation per view.
//! - [`BatchScheduler`]: users in parallel with bounded concurrency and a
//!   per-user timeout.
//! - Consumer queries: `current_concepts`, `active_views`, `flagged_conflicts`.

pub mod counter_evidence;
pub mod engine;
pub mod locks;
pub mod queries;
pub mod report;
pub mod scheduler;

pub use counter_evidence::{CounterEvidenceOutcome, CounterEvidenceRecorder};
pub use engine::BeliefPipeline;
pub use locks::ViewLocks;
pub use report::{BatchReport, CycleReport, UserOutcome, UserResult};
pub use scheduler::{BatchScheduler, DeadlineToken};
