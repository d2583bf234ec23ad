use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::debug;

use crate::channel::StreamChannel;
use crate::error::{ChannelError, Result};

/// Prefix selecting a TCP serial bridge instead of a local device node.
pub const TCP_SCHEME: &str = "tcp://";

/// Longest line `read_until` will buffer. Default: 4 KiB.
pub const DEFAULT_MAX_LINE: usize = 4 * 1024;

/// Configuration for opening a device channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Read timeout for blocking operations. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking operations. `None` blocks forever.
    pub write_timeout: Option<Duration>,
    /// Maximum bytes `read_until` accepts before the delimiter.
    pub max_line: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            read_timeout: None,
            write_timeout: None,
            max_line: DEFAULT_MAX_LINE,
        }
    }
}

/// A connected device stream, implements Read + Write.
///
/// Either a local character device (or any file opened read/write) or a TCP
/// connection to a serial bridge.
pub struct DeviceStream {
    inner: DeviceStreamInner,
}

enum DeviceStreamInner {
    File(File),
    Tcp(TcpStream),
}

impl Read for DeviceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DeviceStreamInner::File(file) => file.read(buf),
            DeviceStreamInner::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for DeviceStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DeviceStreamInner::File(file) => file.write(buf),
            DeviceStreamInner::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            DeviceStreamInner::File(file) => file.flush(),
            DeviceStreamInner::Tcp(stream) => stream.flush(),
        }
    }
}

impl DeviceStream {
    /// Open a device target.
    ///
    /// `tcp://host:port` connects to a serial bridge and applies the
    /// configured timeouts. Anything else is treated as a path and opened
    /// read/write; timeouts are not applied to device nodes.
    pub fn open(target: &str, config: &ChannelConfig) -> Result<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ChannelError::InvalidTarget("empty target".to_string()));
        }

        if let Some(addr) = target.strip_prefix(TCP_SCHEME) {
            if addr.is_empty() {
                return Err(ChannelError::InvalidTarget(target.to_string()));
            }
            let stream = TcpStream::connect(addr).map_err(|source| ChannelError::Open {
                target: target.to_string(),
                source,
            })?;
            stream.set_nodelay(true)?;
            stream.set_read_timeout(config.read_timeout)?;
            stream.set_write_timeout(config.write_timeout)?;
            debug!(%target, "connected to serial bridge");
            return Ok(Self {
                inner: DeviceStreamInner::Tcp(stream),
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(target)
            .map_err(|source| ChannelError::Open {
                target: target.to_string(),
                source,
            })?;
        if config.read_timeout.is_some() || config.write_timeout.is_some() {
            debug!(%target, "timeouts are not applied to device nodes");
        }
        debug!(%target, "opened device node");
        Ok(Self {
            inner: DeviceStreamInner::File(file),
        })
    }

    /// Whether this stream is a TCP bridge connection.
    pub fn is_tcp(&self) -> bool {
        matches!(self.inner, DeviceStreamInner::Tcp(_))
    }
}

impl std::fmt::Debug for DeviceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            DeviceStreamInner::File(_) => {
                f.debug_struct("DeviceStream").field("type", &"file").finish()
            }
            DeviceStreamInner::Tcp(_) => {
                f.debug_struct("DeviceStream").field("type", &"tcp").finish()
            }
        }
    }
}

/// Open a device target and wrap it in a [`StreamChannel`].
pub fn open(target: &str, config: ChannelConfig) -> Result<StreamChannel<DeviceStream>> {
    let stream = DeviceStream::open(target, &config)?;
    Ok(StreamChannel::with_config(stream, config))
}
