//! Multiplicative confidence factors.

pub mod evidence;
pub mod timespan;
