//! Manual vitals demo

use hush_hal::{Clock, Uart};
use hush_protocol::{Link, MotorNode};

use crate::config::{ControllerTuning, ScheduleTiming};
use crate::controller::{Controller, Step};
use crate::grid::GridCell;
use crate::report::StatusReport;
use crate::scheduler::Cadence;
use crate::vitals::Vitals;

const BPM_STEP: u8 = 10;
const BPM_MIN: u8 = 60;
const BPM_MAX: u8 = 240;
const CRY_STEP: u8 = 10;
const CRY_MAX: u8 = 100;
/// Heart rate below which the crying level is forced once
const CRY_FORCE_BELOW_BPM: u8 = 150;
const CRY_FORCED: u8 = 52;

/// Button levels sampled once per demo step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManualButtons {
    pub bpm_down: bool,
    pub bpm_up: bool,
    pub cry_down: bool,
    pub cry_up: bool,
}

/// Operator-adjusted vitals
///
/// Starts stressed (220 bpm, 100 % crying). The first time the heart rate
/// drops below 150 the crying level jumps to 52 once, which puts the next
/// samples at the edge of the crying regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManualVitals {
    vitals: Vitals,
    cry_forced: bool,
}

impl Default for ManualVitals {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualVitals {
    pub const START: Vitals = Vitals::new(220, 100);

    pub const fn new() -> Self {
        Self {
            vitals: Self::START,
            cry_forced: false,
        }
    }

    /// Apply one sample of button levels
    pub fn apply(&mut self, buttons: ManualButtons) -> Vitals {
        let v = &mut self.vitals;
        if buttons.bpm_down {
            v.bpm = v.bpm.saturating_sub(BPM_STEP).max(BPM_MIN);
        }
        if buttons.bpm_up {
            v.bpm = v.bpm.saturating_add(BPM_STEP).min(BPM_MAX);
        }
        if buttons.cry_down {
            v.cry = v.cry.saturating_sub(CRY_STEP);
        }
        if buttons.cry_up {
            v.cry = v.cry.saturating_add(CRY_STEP).min(CRY_MAX);
        }

        if v.bpm < CRY_FORCE_BELOW_BPM && !self.cry_forced {
            v.cry = CRY_FORCED;
            self.cry_forced = true;
        }

        self.vitals
    }

    pub fn current(&self) -> Vitals {
        self.vitals
    }
}

/// Controller driven by [`ManualVitals`]
///
/// Steps once per call; the caller sleeps [`ManualDemo::next_delay_ms`]
/// between calls.
#[derive(Debug, Clone)]
pub struct ManualDemo {
    vitals: ManualVitals,
    controller: Controller,
    cadence: Cadence,
    motor: MotorNode,
}

impl ManualDemo {
    pub fn new(tuning: ControllerTuning, timing: ScheduleTiming, now_ms: u32) -> Self {
        Self {
            vitals: ManualVitals::new(),
            controller: Controller::new(tuning, now_ms),
            cadence: Cadence::new(timing),
            motor: MotorNode::new(),
        }
    }

    /// Command the start cell and restart the run clock
    pub fn start<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) {
        let start = GridCell::START;
        self.motor.command(link, start.amp(), start.freq());
        self.controller.reset(link.clock().now_ms());
        self.cadence.restart();
    }

    /// Read buttons, step the controller and forward its decision
    pub fn step<U: Uart, C: Clock>(
        &mut self,
        link: &mut Link<U, C>,
        buttons: ManualButtons,
    ) -> Step {
        let vitals = self.vitals.apply(buttons);
        let step = self.controller.step(vitals, link.clock().now_ms());
        self.cadence.observe(&step);
        if let Some(cell) = step.command {
            self.motor.command(link, cell.amp(), cell.freq());
        }
        step
    }

    /// Wait before the next step, chosen from the last step
    pub fn next_delay_ms(&self) -> u32 {
        self.cadence.interval_ms()
    }

    pub fn report(&self, now_ms: u32) -> StatusReport {
        StatusReport::capture(
            &self.controller,
            self.vitals.current(),
            self.motor.last_sent(),
            now_ms,
        )
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}
