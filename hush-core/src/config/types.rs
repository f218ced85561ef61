//! Configuration type definitions

use hush_protocol::LinkTiming;

use crate::vitals::{Regime, Vitals};

/// Serial bus settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// UART baud rate
    pub baudrate: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// Control loop cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleTiming {
    /// Interval between vitals polls
    pub poll_interval_ms: u32,
    /// Controller interval in the heartbeat regime
    pub heartbeat_delay_ms: u32,
    /// Controller interval in the crying regime
    pub crying_delay_ms: u32,
    /// Controller interval after a boundary hit
    pub convergence_delay_ms: u32,
    /// Maximum warm-up polls before the main loop
    pub warmup_polls: u16,
    /// Pause between warm-up polls
    pub warmup_interval_ms: u32,
    /// Feed live crying readings to the controller
    ///
    /// When false the controller always sees a crying level of 0.
    pub crying_feedback: bool,
}

impl Default for ScheduleTiming {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            heartbeat_delay_ms: 14_000,
            crying_delay_ms: 4_000,
            convergence_delay_ms: 4_000,
            warmup_polls: 50,
            warmup_interval_ms: 20,
            crying_feedback: false,
        }
    }
}

/// Thresholds used by the search controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerTuning {
    /// Heart rate rise between steps that triggers panic
    pub panic_jump_bpm: u8,
    /// Heart rate drop that counts as an improvement
    pub improve_bpm: u8,
    /// Crying drop (and absolute floor) that counts as an improvement
    pub improve_cry: u8,
    /// Largest heart rate change still considered stable
    pub stable_bpm: u8,
    /// Heart rate below which the crying regime may apply
    pub crying_bpm_ceiling: u8,
    /// Crying level must be above this for the crying regime
    pub crying_band_low: u8,
    /// Crying level must be below this for the crying regime
    pub crying_band_high: u8,
}

impl Default for ControllerTuning {
    fn default() -> Self {
        Self {
            panic_jump_bpm: 30,
            improve_bpm: 10,
            improve_cry: 1,
            stable_bpm: 3,
            crying_bpm_ceiling: 150,
            crying_band_low: 15,
            crying_band_high: 52,
        }
    }
}

impl ControllerTuning {
    /// Pick the improvement signal for a sample
    pub fn regime_for(&self, vitals: Vitals) -> Regime {
        if vitals.bpm < self.crying_bpm_ceiling
            && vitals.cry > self.crying_band_low
            && vitals.cry < self.crying_band_high
        {
            Regime::Crying
        } else {
            Regime::Heartbeat
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    pub bus: BusConfig,
    pub link: LinkTiming,
    pub schedule: ScheduleTiming,
    pub controller: ControllerTuning,
}
