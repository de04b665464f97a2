//! # belief-registry
//!
//! The only writer of stable concepts. Every operation appends a new version
//! or flips a deprecation flag; history rows are never rewritten.

pub mod registry;

pub use registry::ConceptRegistry;
