//! RP2040 implementations of the `hush-hal` traits
//!
//! - [`uart::BusUart`] - the shared serial bus over any blocking
//!   `embedded-io` port (normally an `embassy_rp` `BufferedUart`)
//! - [`time::EmbassyClock`] - `embassy-time` backed millisecond clock
//! - [`gpio::RpInput`] - switches and buttons with optional inversion
//! - [`reset`] - software reset

#![no_std]

pub mod gpio;
pub mod time;
pub mod uart;

pub use gpio::RpInput;
pub use time::EmbassyClock;
pub use uart::{BusUart, UartBusError};

/// Reset the chip
pub fn reset() -> ! {
    cortex_m::peripheral::SCB::sys_reset()
}
