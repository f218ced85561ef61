//! Switch and button inputs

use embassy_rp::gpio::{Input, Pull};
use hush_hal::InputPin;

/// A GPIO input reporting "on" as high
///
/// Inputs wired to ground with a pull-up are active-low; the inversion is
/// applied here so callers only see on/off or pressed/released.
pub struct RpInput<'d> {
    pin: Input<'d>,
    active_low: bool,
}

impl<'d> RpInput<'d> {
    /// Wrap `pin`, treating it as active-low when it is pulled up
    pub fn new(pin: Input<'d>, pull: Pull) -> Self {
        Self {
            pin,
            active_low: matches!(pull, Pull::Up),
        }
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high() != self.active_low
    }
}
