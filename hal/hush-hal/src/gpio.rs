//! GPIO pin abstractions
//!
//! The decision node only reads digital inputs: the run-mode switches and
//! the operator buttons.

/// Digital input pin
///
/// Implementations handle inversion, so `is_high` always means
/// "switch on" or "button pressed".
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &T {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}
