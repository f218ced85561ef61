//! Controller step cadence

use crate::config::ScheduleTiming;
use crate::controller::Step;
use crate::vitals::Regime;

/// Decides when the controller is due again
///
/// The interval depends on the previous step: short after a boundary hit
/// or in the crying regime, long in the heartbeat regime. The very first
/// check is always due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cadence {
    timing: ScheduleTiming,
    last_step_ms: Option<u32>,
    boundary_hit: bool,
    regime: Regime,
}

impl Cadence {
    pub fn new(timing: ScheduleTiming) -> Self {
        Self {
            timing,
            last_step_ms: None,
            boundary_hit: false,
            regime: Regime::Heartbeat,
        }
    }

    /// Current wait between controller steps
    pub fn interval_ms(&self) -> u32 {
        if self.boundary_hit {
            self.timing.convergence_delay_ms
        } else if self.regime == Regime::Crying {
            self.timing.crying_delay_ms
        } else {
            self.timing.heartbeat_delay_ms
        }
    }

    /// Whether a step is due at `now_ms`, without claiming it
    pub fn is_due(&self, now_ms: u32) -> bool {
        self.last_step_ms
            .map_or(true, |last| now_ms.wrapping_sub(last) >= self.interval_ms())
    }

    /// Claim the slot if a step is due; the interval restarts at `now_ms`
    pub fn poll_due(&mut self, now_ms: u32) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.last_step_ms = Some(now_ms);
        true
    }

    /// Take the next interval from a completed step
    pub fn observe(&mut self, step: &Step) {
        self.boundary_hit = step.boundary_hit;
        self.regime = step.regime;
    }

    /// Forget all history; the next check is due immediately
    pub fn restart(&mut self) {
        *self = Self::new(self.timing);
    }

    pub fn timing(&self) -> &ScheduleTiming {
        &self.timing
    }
}
