//! Time abstractions
//!
//! Every wait on the decision node is a bounded busy-wait built from
//! [`Clock::delay_ms`]. Routing them through this trait lets tests advance
//! a fake clock instead of sleeping.

/// Monotonic millisecond clock with a blocking delay
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (wraps at `u32::MAX`)
    fn now_ms(&self) -> u32;

    /// Block the calling thread for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Milliseconds elapsed since `since`, tolerant of counter wrap-around
    fn elapsed_since(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
