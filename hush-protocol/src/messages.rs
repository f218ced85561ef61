//! Command and reply payloads
//!
//! Every payload starts with a single ASCII command byte:
//! - Master → node: ping, heartbeat request, crying request, motor command
//! - Node → Master: ping acknowledgement, sensor readings

use crate::address::Address;
use crate::frame::{Frame, FrameError};

// Command bytes
pub const CMD_PING: u8 = b'A';
pub const CMD_HEARTBEAT: u8 = b'H';
pub const CMD_CRYING: u8 = b'C';
pub const CMD_MOTOR: u8 = b'M';

/// Commands sent by the decision node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Liveness probe, answered with `{'A'}`
    Ping,
    /// Heart rate request, answered with `{'H', bpm}`
    Heartbeat,
    /// Crying level request, answered with `{'C', level}`
    Crying,
    /// Motor setting, never answered
    Motor { amp: u8, freq: u8 },
}

impl Command {
    /// Leading payload byte
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Ping => CMD_PING,
            Command::Heartbeat => CMD_HEARTBEAT,
            Command::Crying => CMD_CRYING,
            Command::Motor { .. } => CMD_MOTOR,
        }
    }

    /// Encode this command into a frame from the master to `dest`
    pub fn to_frame(&self, dest: Address) -> Result<Frame, FrameError> {
        match self {
            Command::Motor { amp, freq } => {
                Frame::new(dest, Address::Master, &[CMD_MOTOR, *amp, *freq])
            }
            other => Frame::new(dest, Address::Master, &[other.opcode()]),
        }
    }
}

/// Replies recognised from sensor and actuator nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Ping acknowledgement
    Ack,
    /// Heart rate in beats per minute
    Heartbeat(u8),
    /// Crying level in percent
    Crying(u8),
}

impl Reply {
    /// Parse a reply payload
    ///
    /// Sensor replies need at least two bytes; extra bytes are ignored.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            [CMD_PING, ..] => Some(Reply::Ack),
            [CMD_HEARTBEAT, value, ..] => Some(Reply::Heartbeat(*value)),
            [CMD_CRYING, value, ..] => Some(Reply::Crying(*value)),
            _ => None,
        }
    }

    /// Command byte this reply answers
    pub fn opcode(&self) -> u8 {
        match self {
            Reply::Ack => CMD_PING,
            Reply::Heartbeat(_) => CMD_HEARTBEAT,
            Reply::Crying(_) => CMD_CRYING,
        }
    }

    /// Sampled value carried by a sensor reply
    pub fn value(&self) -> Option<u8> {
        match self {
            Reply::Ack => None,
            Reply::Heartbeat(v) | Reply::Crying(v) => Some(*v),
        }
    }
}
