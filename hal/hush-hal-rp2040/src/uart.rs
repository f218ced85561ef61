//! Serial bus over `embedded-io`
//!
//! `BufferedUart` keeps received bytes in its ring buffer, so
//! `read_ready` can be answered without blocking.

use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};
use hush_hal::{UartRx, UartTx};

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Receive overrun
    Overrun,
    /// Framing, parity or break condition
    Invalid,
    /// Other error
    Other,
}

impl From<ErrorKind> for UartBusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::OutOfMemory => UartBusError::Overrun,
            ErrorKind::InvalidData => UartBusError::Invalid,
            _ => UartBusError::Other,
        }
    }
}

/// Adapter from a blocking `embedded-io` port to the `hush-hal` UART traits
pub struct BusUart<T> {
    inner: T,
}

impl<T> BusUart<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Write> UartTx for BusUart<T> {
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner
            .write_all(data)
            .map_err(|e| UartBusError::from(e.kind()))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(|e| UartBusError::from(e.kind()))
    }
}

impl<T: Read + ReadReady> UartRx for BusUart<T> {
    type Error = UartBusError;

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        self.inner
            .read_ready()
            .map_err(|e| UartBusError::from(e.kind()))
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.inner.read(buf).map_err(|e| UartBusError::from(e.kind()))
    }
}
