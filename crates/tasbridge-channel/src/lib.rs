//! Blocking duplex byte channel to a controller-emulation device.
//!
//! This is the lowest layer of tasbridge. The session engine only ever talks
//! to a [`ByteChannel`]; how the link is opened is decided here:
//! - A character device or plain file (`/dev/ttyACM0`)
//! - A TCP serial bridge (`tcp://host:port`)
//!
//! Line settings (baud rate, parity) are left to the operating system.

pub mod channel;
pub mod error;
pub mod stream;

pub use channel::{ByteChannel, StreamChannel};
pub use error::{ChannelError, Result};
pub use stream::{open, ChannelConfig, DeviceStream, DEFAULT_MAX_LINE, TCP_SCHEME};
