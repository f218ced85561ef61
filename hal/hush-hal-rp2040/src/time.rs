//! Millisecond clock backed by the embassy time driver

use embassy_time::{block_for, Duration, Instant};
use hush_hal::Clock;

/// Clock reading `embassy_time::Instant`
///
/// Delays busy-wait; the control loop never yields to the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation wraps after ~49 days; callers use wrapping arithmetic
        Instant::now().as_millis() as u32
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}
