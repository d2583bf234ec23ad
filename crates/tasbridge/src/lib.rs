//! Play back and record controller input on console TAS replay devices.
//!
//! # Crate Structure
//!
//! - [`channel`]: blocking byte channel to the device (character device or TCP bridge)
//! - [`frame`]: wire codec and device profiles
//! - [`movie`]: per-frame controller input storage and movie metadata
//! - [`session`]: playback and recording engines

/// Re-export channel types.
pub mod channel {
    pub use tasbridge_channel::*;
}

/// Re-export frame codec types.
pub mod frame {
    pub use tasbridge_frame::*;
}

/// Re-export movie types.
pub mod movie {
    pub use tasbridge_movie::*;
}

/// Re-export session types.
pub mod session {
    pub use tasbridge_session::*;
}
