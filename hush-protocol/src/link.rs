//! Framed transport over the shared serial bus
//!
//! The link owns the UART and the clock. All waits are counted in 1 ms
//! delay steps, so the budgets below are upper bounds on idle time rather
//! than wall-clock deadlines.

use hush_hal::{Clock, Uart};

use crate::address::Address;
use crate::frame::{Frame, MAX_PAYLOAD_SIZE};
use crate::messages::{Command, Reply};

/// Timing budgets for bus transactions, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkTiming {
    /// Wait for each individual byte of a frame
    pub byte_timeout_ms: u32,
    /// Total time a ping keeps probing before the node is declared missing
    pub ping_total_ms: u32,
    /// Interval between repeated ping probes
    pub ping_retry_ms: u32,
    /// Reply window for heartbeat requests
    pub heartbeat_window_ms: u32,
    /// Reply window for crying requests
    pub crying_window_ms: u32,
}

impl Default for LinkTiming {
    fn default() -> Self {
        Self {
            byte_timeout_ms: 20,
            ping_total_ms: 1500,
            ping_retry_ms: 100,
            heartbeat_window_ms: 200,
            crying_window_ms: 20,
        }
    }
}

/// Receive failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Nothing was waiting, or the header timed out
    NoFrame,
    /// An addressed frame timed out mid-payload
    Malformed,
}

/// Outcome of a successful receive
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reception {
    /// A frame addressed to this node
    Frame(Frame),
    /// A frame for some other node (or from an unknown sender) was consumed
    NotForMe,
}

/// One endpoint on the bus
pub struct Link<U, C> {
    uart: U,
    clock: C,
    own: Address,
    timing: LinkTiming,
}

impl<U: Uart, C: Clock> Link<U, C> {
    /// Create a link endpoint answering to `own`
    pub fn new(uart: U, clock: C, own: Address, timing: LinkTiming) -> Self {
        Self {
            uart,
            clock,
            own,
            timing,
        }
    }

    /// Address this endpoint answers to
    pub fn own_address(&self) -> Address {
        self.own
    }

    /// Timing budgets in use
    pub fn timing(&self) -> &LinkTiming {
        &self.timing
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Write a frame to the bus
    ///
    /// Transmit errors are not observable to callers.
    pub fn send(&mut self, frame: &Frame) {
        if let Ok(bytes) = frame.encode_to_vec() {
            let _ = self.uart.write_blocking(&bytes);
            let _ = self.uart.flush();
        }
    }

    /// Encode and send a command from this endpoint to `dest`
    pub fn send_command(&mut self, dest: Address, command: Command) {
        if let Ok(mut frame) = command.to_frame(dest) {
            frame.src = self.own;
            self.send(&frame);
        }
    }

    /// Whether at least one byte is already waiting
    pub fn data_available(&mut self) -> bool {
        self.uart.read_ready().unwrap_or(false)
    }

    fn read_byte_timeout(&mut self) -> Option<u8> {
        let mut waited = 0;
        while waited < self.timing.byte_timeout_ms {
            if self.data_available() {
                return self.uart.read_byte().ok();
            }
            self.clock.delay_ms(1);
            waited += 1;
        }
        None
    }

    /// Try to receive one frame
    ///
    /// Returns [`LinkError::NoFrame`] at once if no byte is waiting. A
    /// frame for another node has its payload drained so the next call
    /// starts on a frame boundary. LEN values above the payload ceiling are
    /// clamped; the excess stays in the stream.
    pub fn receive_one(&mut self) -> Result<Reception, LinkError> {
        if !self.data_available() {
            return Err(LinkError::NoFrame);
        }

        let dest = self.read_byte_timeout().ok_or(LinkError::NoFrame)?;
        let src = self.read_byte_timeout().ok_or(LinkError::NoFrame)?;
        let len = self.read_byte_timeout().ok_or(LinkError::NoFrame)?;

        if dest != self.own.to_byte() {
            for _ in 0..len {
                // Best effort: a timeout here may leave the stream misaligned
                let _ = self.read_byte_timeout();
            }
            return Ok(Reception::NotForMe);
        }

        let len = (len as usize).min(MAX_PAYLOAD_SIZE);
        let mut payload = [0u8; MAX_PAYLOAD_SIZE];
        for slot in payload[..len].iter_mut() {
            *slot = self.read_byte_timeout().ok_or(LinkError::Malformed)?;
        }

        match Address::from_byte(src) {
            Some(src) => Frame::new(self.own, src, &payload[..len])
                .map(Reception::Frame)
                .map_err(|_| LinkError::Malformed),
            None => Ok(Reception::NotForMe),
        }
    }

    /// Discard every frame already sitting in the receive buffer
    ///
    /// Returns the number of frames dropped. Stops at the first receive
    /// failure.
    pub fn drain_buffered(&mut self) -> usize {
        let mut drained = 0;
        while self.data_available() {
            match self.receive_one() {
                Ok(_) => drained += 1,
                Err(_) => break,
            }
        }
        drained
    }

    /// Receive once and check for a reply from `from` with the given command byte
    pub fn take_reply(&mut self, from: Address, opcode: u8) -> Option<Reply> {
        match self.receive_one() {
            Ok(Reception::Frame(frame)) if frame.src == from => {
                Reply::from_payload(&frame.payload).filter(|reply| reply.opcode() == opcode)
            }
            _ => None,
        }
    }

    /// Poll for a matching reply for up to `window_ms` idle milliseconds
    pub fn await_reply(&mut self, from: Address, opcode: u8, window_ms: u32) -> Option<Reply> {
        let mut waited = 0;
        while waited < window_ms {
            if let Some(reply) = self.take_reply(from, opcode) {
                return Some(reply);
            }
            self.clock.delay_ms(1);
            waited += 1;
        }
        None
    }
}
