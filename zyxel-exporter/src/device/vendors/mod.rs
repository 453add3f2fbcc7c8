//! Vendor dialect implementations.

pub mod vmg1312_b10d;
pub mod vmg1312_t20b;

pub use vmg1312_b10d::Vmg1312B10d;
pub use vmg1312_t20b::{LineState, Vmg1312T20b};
