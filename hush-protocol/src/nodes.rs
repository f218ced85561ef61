//! Proxies for the remote nodes
//!
//! Each proxy knows its node's address and command convention. Sensors are
//! blocking request/reply with a bounded window; the motor is
//! fire-and-forget.

use hush_hal::{Clock, Uart};

use crate::address::Address;
use crate::link::{Link, LinkTiming};
use crate::messages::{Command, CMD_PING};

/// Result of a liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeStatus {
    Alive,
    Missing,
}

impl NodeStatus {
    pub fn is_alive(self) -> bool {
        self == NodeStatus::Alive
    }
}

/// Probe `target` until it acknowledges or the ping budget runs out
///
/// A probe is resent every `ping_retry_ms`. Only an `'A'` reply whose
/// source is `target` counts.
pub fn ping<U: Uart, C: Clock>(link: &mut Link<U, C>, target: Address) -> NodeStatus {
    let LinkTiming {
        ping_total_ms,
        ping_retry_ms,
        ..
    } = *link.timing();

    let mut waited = 0;
    let mut since_send = ping_retry_ms;

    while waited < ping_total_ms {
        if since_send >= ping_retry_ms {
            link.send_command(target, Command::Ping);
            since_send = 0;
        }

        if link.take_reply(target, CMD_PING).is_some() {
            return NodeStatus::Alive;
        }

        link.clock_mut().delay_ms(1);
        waited += 1;
        since_send += 1;
    }

    NodeStatus::Missing
}

/// Liveness of the three remote nodes, as found by the boot pings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeLiveness {
    pub heartbeat: NodeStatus,
    pub crying: NodeStatus,
    pub motor: NodeStatus,
}

impl NodeLiveness {
    /// Ping every remote node in turn
    pub fn probe<U: Uart, C: Clock>(link: &mut Link<U, C>) -> Self {
        Self {
            heartbeat: ping(link, Address::Heartbeat),
            crying: ping(link, Address::Crying),
            motor: ping(link, Address::Motor),
        }
    }

    /// Treat every node as alive
    pub const fn all_alive() -> Self {
        Self {
            heartbeat: NodeStatus::Alive,
            crying: NodeStatus::Alive,
            motor: NodeStatus::Alive,
        }
    }
}

/// A sensor node answering `{cmd}` with `{cmd, value}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorNode {
    address: Address,
    command: Command,
    reply_window_ms: u32,
    drain_stale: bool,
}

impl SensorNode {
    /// Heart rate sensor
    ///
    /// Stale replies are drained before each request so a late answer to
    /// the previous request is never taken as the current one.
    pub fn heartbeat(timing: &LinkTiming) -> Self {
        Self {
            address: Address::Heartbeat,
            command: Command::Heartbeat,
            reply_window_ms: timing.heartbeat_window_ms,
            drain_stale: true,
        }
    }

    /// Crying level sensor
    ///
    /// Does not drain stale replies first.
    pub fn crying(timing: &LinkTiming) -> Self {
        Self {
            address: Address::Crying,
            command: Command::Crying,
            reply_window_ms: timing.crying_window_ms,
            drain_stale: false,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Request one sample; `None` if no matching reply arrived in the window
    pub fn request<U: Uart, C: Clock>(&self, link: &mut Link<U, C>) -> Option<u8> {
        if self.drain_stale {
            link.drain_buffered();
        }

        link.send_command(self.address, self.command);
        link.await_reply(self.address, self.command.opcode(), self.reply_window_ms)
            .and_then(|reply| reply.value())
    }
}

/// The vibration motor actuator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorNode {
    last_sent: Option<(u8, u8)>,
}

impl MotorNode {
    pub const fn new() -> Self {
        Self { last_sent: None }
    }

    /// Send an amplitude/frequency setting; no reply is awaited
    pub fn command<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>, amp: u8, freq: u8) {
        self.last_sent = Some((amp, freq));
        link.send_command(Address::Motor, Command::Motor { amp, freq });
    }

    /// Last `(amp, freq)` pair sent
    pub fn last_sent(&self) -> Option<(u8, u8)> {
        self.last_sent
    }
}
