//! Control loop scheduling
//!
//! Vitals are polled on a fast fixed cadence; the controller runs on a
//! slower, regime-dependent one.

pub mod cadence;
pub mod runner;

pub use cadence::Cadence;
pub use runner::{DecisionLoop, Tick};
