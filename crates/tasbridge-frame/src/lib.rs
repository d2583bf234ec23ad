//! Wire codec for the controller-emulation device protocol.
//!
//! Every exchange with the device starts with a single command tag byte:
//! - `0xFC..=0xFF`: a log line (debug/info/warn/error), terminated by `\n`
//! - frame-request tag: the device wants input samples for playback
//! - capture tag: the device delivers a console/controller exchange it saw
//!
//! Tag values other than the log range come from a [`DeviceProfile`], so a
//! firmware revision with different constants only needs a new profile.
//! Nothing in this crate holds session state.

pub mod codec;
pub mod error;
pub mod log;
pub mod profile;
pub mod sample;

pub use codec::{
    capture_body_len, decode_capture_block, decode_frame_request, encode_config_block,
    encode_frame_response, encode_record_select, CaptureBlock, CAPTURE_HEADER_SIZE,
    MAX_RESPONSE_SAMPLES, POLL_INPUTS,
};
pub use error::{FrameError, Result};
pub use log::{decode_log, decode_log_lossy, LogMessage, Severity, LOG_TERMINATOR};
pub use profile::{
    CommandTag, ControllerPort, DeviceProfile, SessionMode, CONFIG_BLOCK_SIZE, PORT_COUNT,
};
pub use sample::{InputSample, SAMPLE_WIDTH};
