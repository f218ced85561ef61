//! Board-agnostic decision logic for the soother node
//!
//! Everything here runs against the `hush-hal` traits and can be tested on
//! the host:
//!
//! - 5x5 actuation grid and anchor registry
//! - Hill-climbing controller with panic recovery
//! - Regime-dependent scheduling of controller steps
//! - The decision loop tying sensors, controller and motor together
//! - Operator modes (manual demo, link monitor)
//! - Configuration types and a small `node.toml` parser

#![no_std]
#![deny(unsafe_code)]

pub mod anchor;
pub mod config;
pub mod controller;
pub mod grid;
pub mod modes;
pub mod report;
pub mod scheduler;
pub mod vitals;

pub use controller::{Controller, Step, Trace};
pub use grid::{GridCell, Move, GRID_SIZE};
pub use vitals::{Regime, Vitals};
