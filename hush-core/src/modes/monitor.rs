//! Link monitor
//!
//! Bus bring-up aid. Pings every node once, then keeps polling the live
//! sensors while two buttons fire preset motor commands.

use hush_hal::{Clock, Uart};
use hush_protocol::{Link, LinkTiming, MotorNode, NodeLiveness, SensorNode};

/// Delay between monitor polls
pub const MONITOR_POLL_MS: u32 = 20;

/// Motor setting sent on the first preset button
pub const PRESET_A: (u8, u8) = (100, 70);
/// Motor setting sent on the second preset button
pub const PRESET_B: (u8, u8) = (80, 60);

/// Rising-edge detector for a sampled level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { last: false }
    }

    /// Feed one sample; true only on a low-to-high transition
    pub fn rising(&mut self, level: bool) -> bool {
        let edge = level && !self.last;
        self.last = level;
        edge
    }
}

/// Button levels sampled once per monitor poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorButtons {
    pub preset_a: bool,
    pub preset_b: bool,
    pub restart: bool,
}

/// What the monitor asked for this poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorAction {
    #[default]
    None,
    /// A preset motor command was sent
    Motor(u8, u8),
    /// The operator asked for a restart
    Restart,
}

/// Readings and action from one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorPoll {
    pub heartbeat: Option<u8>,
    pub crying: Option<u8>,
    pub action: MonitorAction,
}

#[derive(Debug, Clone)]
pub struct LinkMonitor {
    liveness: NodeLiveness,
    heartbeat: SensorNode,
    crying: SensorNode,
    motor: MotorNode,
    preset_a: EdgeDetector,
    preset_b: EdgeDetector,
    restart: EdgeDetector,
}

impl LinkMonitor {
    pub fn new(timing: &LinkTiming) -> Self {
        Self {
            liveness: NodeLiveness::all_alive(),
            heartbeat: SensorNode::heartbeat(timing),
            crying: SensorNode::crying(timing),
            motor: MotorNode::new(),
            preset_a: EdgeDetector::new(),
            preset_b: EdgeDetector::new(),
            restart: EdgeDetector::new(),
        }
    }

    /// Ping every node
    pub fn start<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) -> NodeLiveness {
        self.liveness = NodeLiveness::probe(link);
        self.liveness
    }

    /// Poll live sensors and handle buttons
    ///
    /// A restart request wins over the presets. Presets are only sent to a
    /// motor that answered its ping.
    pub fn poll<U: Uart, C: Clock>(
        &mut self,
        link: &mut Link<U, C>,
        buttons: MonitorButtons,
    ) -> MonitorPoll {
        let mut poll = MonitorPoll::default();

        if self.liveness.heartbeat.is_alive() {
            poll.heartbeat = self.heartbeat.request(link);
        }
        if self.liveness.crying.is_alive() {
            poll.crying = self.crying.request(link);
        }

        let a = self.preset_a.rising(buttons.preset_a);
        let b = self.preset_b.rising(buttons.preset_b);
        let restart = self.restart.rising(buttons.restart);

        let motor_alive = self.liveness.motor.is_alive();
        poll.action = if restart {
            MonitorAction::Restart
        } else if a && motor_alive {
            self.send(link, PRESET_A)
        } else if b && motor_alive {
            self.send(link, PRESET_B)
        } else {
            MonitorAction::None
        };

        poll
    }

    pub fn liveness(&self) -> NodeLiveness {
        self.liveness
    }

    fn send<U: Uart, C: Clock>(
        &mut self,
        link: &mut Link<U, C>,
        (amp, freq): (u8, u8),
    ) -> MonitorAction {
        self.motor.command(link, amp, freq);
        MonitorAction::Motor(amp, freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_hal::mock::{FakeClock, ScriptedUart};
    use hush_protocol::Address;

    fn link(clock: &FakeClock) -> Link<ScriptedUart<'_>, &FakeClock> {
        Link::new(
            ScriptedUart::new(clock),
            clock,
            Address::Master,
            LinkTiming::default(),
        )
    }

    #[test]
    fn test_edge_detector() {
        let mut edge = EdgeDetector::new();
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
        assert!(!edge.rising(true));
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
    }

    #[test]
    fn test_preset_sent_once_per_press() {
        let clock = FakeClock::new();
        let mut link = link(&clock);
        let mut monitor = LinkMonitor::new(link.timing());
        monitor.liveness = NodeLiveness {
            heartbeat: hush_protocol::NodeStatus::Missing,
            crying: hush_protocol::NodeStatus::Missing,
            motor: hush_protocol::NodeStatus::Alive,
        };

        let held = MonitorButtons {
            preset_a: true,
            ..Default::default()
        };
        assert_eq!(monitor.poll(&mut link, held).action, MonitorAction::Motor(100, 70));
        assert_eq!(monitor.poll(&mut link, held).action, MonitorAction::None);
        assert_eq!(link.uart().sent(), &[3, 0, 3, b'M', 100, 70]);

        let b = MonitorButtons {
            preset_b: true,
            ..Default::default()
        };
        assert_eq!(monitor.poll(&mut link, b).action, MonitorAction::Motor(80, 60));
    }

    #[test]
    fn test_missing_motor_gets_no_presets() {
        let clock = FakeClock::new();
        let mut link = link(&clock);
        let mut monitor = LinkMonitor::new(link.timing());
        monitor.liveness = NodeLiveness {
            heartbeat: hush_protocol::NodeStatus::Missing,
            crying: hush_protocol::NodeStatus::Missing,
            motor: hush_protocol::NodeStatus::Missing,
        };

        let press = MonitorButtons {
            preset_a: true,
            ..Default::default()
        };
        assert_eq!(monitor.poll(&mut link, press).action, MonitorAction::None);
        assert!(link.uart().sent().is_empty());
    }

    #[test]
    fn test_restart_wins() {
        let clock = FakeClock::new();
        let mut link = link(&clock);
        let mut monitor = LinkMonitor::new(link.timing());
        monitor.liveness.heartbeat = hush_protocol::NodeStatus::Missing;
        monitor.liveness.crying = hush_protocol::NodeStatus::Missing;

        let both = MonitorButtons {
            preset_a: true,
            preset_b: false,
            restart: true,
        };
        assert_eq!(monitor.poll(&mut link, both).action, MonitorAction::Restart);
        assert!(link.uart().sent().is_empty());
    }

    #[test]
    fn test_polls_only_live_sensors() {
        let clock = FakeClock::new();
        let mut link = link(&clock);
        link.uart_mut().push_rx(&[0, 1, 1, b'A']).unwrap();

        let mut monitor = LinkMonitor::new(link.timing());
        let liveness = monitor.start(&mut link);
        assert!(liveness.heartbeat.is_alive());
        link.uart_mut().clear_sent();

        let at = clock.get() + 5;
        link.uart_mut().push_rx_at(at, &[0, 1, 2, b'H', 130]).unwrap();
        let poll = monitor.poll(&mut link, MonitorButtons::default());

        assert_eq!(poll.heartbeat, Some(130));
        assert_eq!(poll.crying, None);
        assert_eq!(link.uart().sent(), &[1, 0, 1, b'H']);
    }
}
