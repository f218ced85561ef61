//! Serial bus access
//!
//! The bus is a plain byte stream. Receivers must be able to report whether
//! a byte is already waiting so that callers can implement their own
//! per-byte timeouts instead of blocking forever.

/// Transmit half of the bus
pub trait UartTx {
    type Error;

    /// Queue `data` for transmission, blocking while the FIFO is full
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until every queued byte has left the wire
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Receive half of the bus
pub trait UartRx {
    type Error;

    /// True if at least one byte can be read without blocking
    fn read_ready(&mut self) -> Result<bool, Self::Error>;

    /// Read up to `buf.len()` bytes, blocking until at least one arrives
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.read_blocking(&mut byte)?;
        Ok(byte[0])
    }
}

/// A bus port that can both send and receive
pub trait Uart: UartTx + UartRx {}

impl<T: UartTx + UartRx> Uart for T {}
