//! Transport abstraction: any byte-oriented channel.
//!
//! Production uses the ESP-IDF UART driver (`adapters::uart::UartTransport`);
//! tests use in-memory pipes.  Client and server are generic over `Transport`.

/// Failure of [`Transport::write_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError<E> {
    /// The underlying channel reported an error.
    Transport(E),
    /// The channel accepted zero bytes of a non-empty write.
    WriteZero,
}

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write all of `data`, retrying short writes.  A write that accepts
    /// nothing ends the attempt with [`WriteError::WriteZero`].
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), WriteError<Self::Error>> {
        while !data.is_empty() {
            match self.write(data).map_err(WriteError::Transport)? {
                0 => return Err(WriteError::WriteZero),
                n => data = &data[n.min(data.len())..],
            }
        }
        Ok(())
    }
}
