//! Hush Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the decision node
//! needs. Chip-specific crates implement them, and the protocol and core
//! crates only ever see these traits. That keeps the bus protocol and the
//! controller testable on the host with the [`mock`] doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (hush-firmware)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hush-protocol / hush-core              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hush-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ hush-hal-     │       │ mock (host    │
//! │    rp2040     │       │   tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital inputs (mode switches, buttons)
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial bus access
//! - [`time::Clock`] - Millisecond clock and blocking delay

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;
pub mod uart;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use gpio::InputPin;
pub use time::Clock;
pub use uart::{Uart, UartRx, UartTx};
