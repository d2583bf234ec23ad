use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::error::{ChannelError, Result};
use crate::stream::ChannelConfig;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 256;

/// A blocking duplex byte stream to the device.
///
/// Reads either return exactly what was asked for or fail. A failure is
/// terminal for the session that owns the channel.
pub trait ByteChannel {
    /// Write every byte of `data` and flush.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Read exactly `n` bytes.
    fn read_exact(&mut self, n: usize) -> Result<Bytes>;

    /// Read up to and including the first `delimiter` byte.
    ///
    /// Fails with [`ChannelError::LineTooLong`] if the delimiter does not
    /// show up within the channel's line limit.
    fn read_until(&mut self, delimiter: u8) -> Result<Bytes>;

    /// Read a single byte.
    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.read_exact(1)?;
        Ok(byte[0])
    }
}

impl<C: ByteChannel + ?Sized> ByteChannel for &mut C {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }

    fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        (**self).read_exact(n)
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        (**self).read_until(delimiter)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

impl<C: ByteChannel + ?Sized> ByteChannel for Box<C> {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }

    fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        (**self).read_exact(n)
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        (**self).read_until(delimiter)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

/// [`ByteChannel`] over any `Read + Write` stream.
///
/// Bytes are pulled from the stream in chunks and kept in an internal
/// buffer, so `read_until` does not cost one syscall per byte.
pub struct StreamChannel<T> {
    inner: T,
    buf: BytesMut,
    config: ChannelConfig,
}

impl<T: Read + Write> StreamChannel<T> {
    /// Create a channel with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ChannelConfig::default())
    }

    /// Create a channel with explicit configuration.
    ///
    /// The configuration is only used to report timeouts; applying them to
    /// the stream is the job of whoever opened it.
    pub fn with_config(inner: T, config: ChannelConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(n) => {
                    trace!(bytes = n, "channel read");
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(map_io(err, self.config.read_timeout)),
            }
        }
    }
}

impl<T: Read + Write> ByteChannel for StreamChannel<T> {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < data.len() {
            match self.inner.write(&data[offset..]) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(map_io(err, self.config.write_timeout)),
            }
        }
        trace!(bytes = data.len(), "channel write");

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(map_io(err, self.config.write_timeout)),
            }
        }
    }

    fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        while self.buf.len() < n {
            self.fill()?;
        }
        Ok(self.buf.split_to(n).freeze())
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        let mut scanned = 0usize;
        loop {
            if let Some(pos) = self.buf[scanned..].iter().position(|&b| b == delimiter) {
                return Ok(self.buf.split_to(scanned + pos + 1).freeze());
            }
            scanned = self.buf.len();
            if scanned >= self.config.max_line {
                return Err(ChannelError::LineTooLong {
                    max: self.config.max_line,
                });
            }
            self.fill()?;
        }
    }
}

fn map_io(err: std::io::Error, timeout: Option<Duration>) -> ChannelError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => {
            ChannelError::TimedOut(timeout.unwrap_or_default())
        }
        ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
            ChannelError::Closed
        }
        _ => ChannelError::Io(err),
    }
}

impl<T> std::fmt::Debug for StreamChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamChannel")
            .field("buffered", &self.buf.len())
            .field("config", &self.config)
            .finish()
    }
}
