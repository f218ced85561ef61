//! Operator run modes
//!
//! Chosen once at boot from the two mode switches. The manual demo drives
//! the controller from buttons instead of sensors; the link monitor
//! exercises the bus without running the controller.

pub mod manual;
pub mod monitor;

pub use manual::{ManualButtons, ManualDemo, ManualVitals};
pub use monitor::{
    EdgeDetector, LinkMonitor, MonitorAction, MonitorButtons, MonitorPoll, MONITOR_POLL_MS,
};

/// Top-level behaviour of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    /// Controller fed with button-adjusted vitals
    ManualDemo,
    /// Ping and poll the nodes, send preset motor commands
    LinkMonitor,
    /// Closed loop on live sensor readings
    Decision,
}

impl RunMode {
    /// Pick the mode from the switch levels; the manual switch wins
    pub fn select(manual_switch: bool, monitor_switch: bool) -> Self {
        if manual_switch {
            RunMode::ManualDemo
        } else if monitor_switch {
            RunMode::LinkMonitor
        } else {
            RunMode::Decision
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        assert_eq!(RunMode::select(false, false), RunMode::Decision);
        assert_eq!(RunMode::select(false, true), RunMode::LinkMonitor);
        assert_eq!(RunMode::select(true, false), RunMode::ManualDemo);
        assert_eq!(RunMode::select(true, true), RunMode::ManualDemo);
    }
}
