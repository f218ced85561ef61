//! Soother Bus Protocol
//!
//! This crate defines the framed request/response protocol spoken between
//! the decision node (bus master) and the heartbeat, crying and motor
//! nodes. All nodes share one serial line and react only to frames
//! addressed to them.
//!
//! # Protocol Overview
//!
//! All messages use a minimal binary frame format:
//! ```text
//! ┌─────┬─────┬─────┬─────────────┐
//! │ DST │ SRC │ LEN │ PAYLOAD     │
//! │ 1B  │ 1B  │ 1B  │ 0–5B        │
//! └─────┴─────┴─────┴─────────────┘
//! ```
//!
//! There are no checksums or sequence numbers. Requests are strictly
//! serialized and replies are paired by source address and leading
//! command byte.

#![no_std]
#![deny(unsafe_code)]

pub mod address;
pub mod frame;
pub mod link;
pub mod messages;
pub mod nodes;

pub use address::Address;
pub use frame::{Frame, FrameError, HEADER_LEN, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use link::{Link, LinkError, LinkTiming, Reception};
pub use messages::{Command, Reply, CMD_CRYING, CMD_HEARTBEAT, CMD_MOTOR, CMD_PING};
pub use nodes::{ping, MotorNode, NodeLiveness, NodeStatus, SensorNode};
