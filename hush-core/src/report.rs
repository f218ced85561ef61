//! Operator status report
//!
//! A one-line summary of the loop: vitals, regime, decided cell, motor
//! output, panic flag and run time. Time is shown as `mm:ss` and freezes
//! once the calm cell was reached.

use core::fmt;

use crate::controller::Controller;
use crate::grid::GridCell;
use crate::vitals::{Regime, Vitals};

/// Milliseconds rendered as `mm:ss`
///
/// Minutes wrap at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Elapsed(pub u32);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 / 1000;
        write!(f, "{:02}:{:02}", (secs / 60) % 100, secs % 60)
    }
}

/// Snapshot of the loop for the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub vitals: Vitals,
    pub regime: Regime,
    pub cell: GridCell,
    /// Last `(amp, freq)` sent to the motor
    pub motor: Option<(u8, u8)>,
    pub panic: bool,
    pub elapsed: Elapsed,
    pub calm: bool,
}

impl StatusReport {
    pub fn capture(
        controller: &Controller,
        vitals: Vitals,
        motor: Option<(u8, u8)>,
        now_ms: u32,
    ) -> Self {
        let state = controller.state();
        Self {
            vitals,
            regime: state.regime,
            cell: state.cell,
            motor,
            panic: state.is_panicking(),
            elapsed: Elapsed(controller.elapsed_ms(now_ms)),
            calm: state.is_calm(),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BPM={} CRY={}% | {} | cell {} | ",
            self.vitals.bpm,
            self.vitals.cry,
            self.regime.label(),
            self.cell
        )?;
        match self.motor {
            Some((amp, freq)) => write!(f, "MOTOR A:{} F:{} | ", amp, freq)?,
            None => f.write_str("MOTOR - | ")?,
        }
        f.write_str(if self.panic {
            "PANIC TRIGGERED"
        } else {
            "PANIC NOT TRIGGERED"
        })?;
        write!(f, " | {}", self.elapsed)?;
        if self.calm {
            f.write_str(" (CALM)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerTuning;
    use core::fmt::Write;
    use heapless::String;

    fn render<T: fmt::Display>(value: T) -> String<128> {
        let mut out = String::new();
        write!(out, "{}", value).unwrap();
        out
    }

    #[test]
    fn test_elapsed_format() {
        assert_eq!(render(Elapsed(0)), "00:00");
        assert_eq!(render(Elapsed(197_000)), "03:17");
        assert_eq!(render(Elapsed(59_999)), "00:59");
        assert_eq!(render(Elapsed(6_000_000)), "00:00");
    }

    #[test]
    fn test_report_line() {
        let controller = Controller::new(ControllerTuning::default(), 0);
        let report = StatusReport::capture(&controller, Vitals::new(180, 0), Some((4, 4)), 14_000);

        assert_eq!(
            render(report),
            "BPM=180 CRY=0% | HB driven | cell A5 F5 | MOTOR A:4 F:4 | PANIC NOT TRIGGERED | 00:14"
        );
    }

    #[test]
    fn test_report_freezes_when_calm() {
        let cell = GridCell::new(0, 1).unwrap();
        let mut controller = Controller::starting_at(cell, ControllerTuning::default(), 0);
        controller.step(Vitals::new(180, 0), 2_000);

        let report = StatusReport::capture(&controller, Vitals::new(180, 0), Some((0, 0)), 90_000);
        assert!(report.calm);
        assert_eq!(report.elapsed, Elapsed(2_000));
        assert!(render(report).ends_with("00:02 (CALM)"));
    }
}
