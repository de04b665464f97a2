//! SQL for each table. Every function takes a borrowed connection so it can
//! run inside a caller-owned transaction.

pub mod concept_ops;
pub mod event_ops;
pub mod view_ops;
