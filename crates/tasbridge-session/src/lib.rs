//! Playback and recording session engine for controller-emulation devices.
//!
//! A session owns one [`ByteChannel`](tasbridge_channel::ByteChannel) and one
//! [`Movie`](tasbridge_movie::Movie) for its whole run. After a one-shot
//! initialization it dispatches on command tags until the channel fails or
//! the operator cancels; there is no other way out of the loop.

pub mod cancel;
pub mod config;
pub mod console;
pub mod error;
pub mod playback;
pub mod probe;
pub mod record;
pub mod status;

mod dispatch;
#[cfg(test)]
mod testing;

pub use cancel::CancelToken;
pub use config::{ExhaustionPolicy, SessionConfig};
pub use console::{Console, N64Movie};
pub use error::{Outcome, Result, SessionError, SessionFailure};
pub use playback::play;
pub use probe::{probe, DeviceInfo};
pub use record::record;
pub use status::{SessionReport, SessionState, Status, StatusSink};
