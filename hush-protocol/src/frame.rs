//! Frame encoding and decoding for the soother bus.
//!
//! Frame format:
//! - DST (1 byte): destination node address
//! - SRC (1 byte): source node address
//! - LEN (1 byte): payload length (0-5)
//! - PAYLOAD (0-5 bytes): command byte followed by arguments
//!
//! There is no start byte and no checksum. Receivers stay aligned only by
//! consuming every frame completely, including frames meant for other nodes.

use heapless::Vec;

use crate::address::Address;

/// Header size in bytes (DST + SRC + LEN)
pub const HEADER_LEN: usize = 3;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 5;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_LEN + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame building, encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Frame is incomplete (need more bytes)
    Incomplete,
    /// Header names an address no node uses
    UnknownAddress,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Node the frame is addressed to
    pub dest: Address,
    /// Node that sent the frame
    pub src: Address,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given addresses and payload
    pub fn new(dest: Address, src: Address, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            dest,
            src,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(dest: Address, src: Address) -> Self {
        Self {
            dest,
            src,
            payload: Vec::new(),
        }
    }

    /// Leading payload byte, if any
    pub fn command(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Total encoded size
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = self.dest.to_byte();
        buffer[1] = self.src.to_byte();
        buffer[2] = self.payload.len() as u8;
        buffer[HEADER_LEN..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Decode one frame from the front of `bytes`
    ///
    /// Returns the frame and the number of bytes it occupied. Unlike the
    /// live receive path, an oversized LEN is rejected rather than clamped.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), FrameError> {
        if bytes.len() < HEADER_LEN {
            return Err(FrameError::Incomplete);
        }

        let len = bytes[2] as usize;
        if len > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        if bytes.len() < HEADER_LEN + len {
            return Err(FrameError::Incomplete);
        }

        let dest = Address::from_byte(bytes[0]).ok_or(FrameError::UnknownAddress)?;
        let src = Address::from_byte(bytes[1]).ok_or(FrameError::UnknownAddress)?;
        let frame = Self::new(dest, src, &bytes[HEADER_LEN..HEADER_LEN + len])?;

        Ok((frame, HEADER_LEN + len))
    }
}
