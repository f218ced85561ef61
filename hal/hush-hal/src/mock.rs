//! Host-side test doubles
//!
//! [`FakeClock`] only moves when something calls [`Clock::delay_ms`] (or a
//! test calls [`FakeClock::advance`]). [`ScriptedUart`] shares the clock
//! and releases each scripted byte once the clock reaches its due time,
//! which models a remote node answering after some delay.

use core::cell::Cell;

use heapless::{Deque, Vec};

use crate::gpio::InputPin;
use crate::time::Clock;
use crate::uart::{UartRx, UartTx};

/// Capacity of the scripted receive queue and the transmit log
pub const MOCK_BUFFER_SIZE: usize = 256;

/// Deterministic clock driven by delays
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Cell<u32>,
}

impl FakeClock {
    /// Create a clock at t = 0
    pub const fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    /// Create a clock at an arbitrary start time
    pub const fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    /// Move time forward without going through a `Clock` handle
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Current time
    pub fn get(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for &FakeClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}

/// Errors reported by [`ScriptedUart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// Transmit log or receive script is full
    Overflow,
    /// A read was attempted while no byte was due
    WouldBlock,
}

/// UART double with a time-scripted receive side and a recorded transmit side
#[derive(Debug)]
pub struct ScriptedUart<'a> {
    clock: &'a FakeClock,
    rx: Deque<(u32, u8), MOCK_BUFFER_SIZE>,
    tx: Vec<u8, MOCK_BUFFER_SIZE>,
}

impl<'a> ScriptedUart<'a> {
    /// Create an idle UART sharing `clock`
    pub fn new(clock: &'a FakeClock) -> Self {
        Self {
            clock,
            rx: Deque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes that are readable immediately
    pub fn push_rx(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        self.push_rx_at(self.clock.get(), bytes)
    }

    /// Queue bytes that become readable once the clock reaches `at_ms`
    pub fn push_rx_at(&mut self, at_ms: u32, bytes: &[u8]) -> Result<(), MockError> {
        for &byte in bytes {
            self.rx
                .push_back((at_ms, byte))
                .map_err(|_| MockError::Overflow)?;
        }
        Ok(())
    }

    /// Everything written so far
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Forget the transmit log
    pub fn clear_sent(&mut self) {
        self.tx.clear();
    }

    /// Number of scripted bytes not yet read (due or not)
    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    fn byte_due(&self) -> bool {
        self.rx
            .front()
            .map_or(false, |&(at_ms, _)| at_ms <= self.clock.get())
    }
}

impl UartTx for ScriptedUart<'_> {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx
            .extend_from_slice(data)
            .map_err(|_| MockError::Overflow)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for ScriptedUart<'_> {
    type Error = MockError;

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.byte_due())
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if !self.byte_due() {
            return Err(MockError::WouldBlock);
        }

        let mut n = 0;
        while n < buf.len() && self.byte_due() {
            if let Some((_, byte)) = self.rx.pop_front() {
                buf[n] = byte;
                n += 1;
            }
        }
        Ok(n)
    }
}

/// Input pin whose level is set by the test
#[derive(Debug, Default)]
pub struct FakePin {
    high: Cell<bool>,
}

impl FakePin {
    /// Create a pin reading low
    pub const fn new() -> Self {
        Self {
            high: Cell::new(false),
        }
    }

    /// Drive the pin level
    pub fn set(&self, high: bool) {
        self.high.set(high);
    }
}

impl InputPin for FakePin {
    fn is_high(&self) -> bool {
        self.high.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_bytes_wait_for_clock() {
        let clock = FakeClock::new();
        let mut uart = ScriptedUart::new(&clock);
        uart.push_rx_at(5, &[0xAB]).unwrap();

        assert!(!uart.read_ready().unwrap());
        clock.advance(5);
        assert!(uart.read_ready().unwrap());
        assert_eq!(uart.read_byte(), Ok(0xAB));
        assert!(!uart.read_ready().unwrap());
    }

    #[test]
    fn test_read_without_due_byte_would_block() {
        let clock = FakeClock::new();
        let mut uart = ScriptedUart::new(&clock);
        assert_eq!(uart.read_byte(), Err(MockError::WouldBlock));
    }

    #[test]
    fn test_transmit_is_recorded() {
        let clock = FakeClock::new();
        let mut uart = ScriptedUart::new(&clock);
        uart.write_blocking(&[1, 2, 3]).unwrap();
        assert_eq!(uart.sent(), &[1, 2, 3]);
        uart.clear_sent();
        assert!(uart.sent().is_empty());
    }

    #[test]
    fn test_fake_clock_delay() {
        let clock = FakeClock::starting_at(100);
        let mut handle = &clock;
        handle.delay_ms(25);
        assert_eq!(handle.now_ms(), 125);
        assert_eq!(handle.elapsed_since(100), 25);
    }
}
