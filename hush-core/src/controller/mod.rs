//! Hill-climbing search controller
//!
//! Turns vitals samples into grid-cell motor commands. Knows nothing about
//! the bus; the run loop feeds it samples and forwards its commands.

pub mod machine;
pub mod state;
pub mod trace;

pub use machine::{Controller, Step, MAX_TRACES};
pub use state::{ControllerState, Mode};
pub use trace::Trace;
