use std::fmt;
use std::io;

use tasbridge_channel::ChannelError;
use tasbridge_frame::FrameError;
use tasbridge_movie::MovieError;
use tasbridge_session::SessionError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const CHANNEL_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;
/// Second Ctrl-C while a session is blocked on the device.
pub const INTERRUPTED: i32 = 130;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    match err {
        ChannelError::Open { target, source } => io_error(&format!("{context} ({target})"), source),
        // An open link that starts failing (EIO from an unplugged adapter) is
        // a lost device, not an internal fault.
        ChannelError::Io(source) => match source.kind() {
            io::ErrorKind::PermissionDenied
            | io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock => io_error(context, source),
            _ => CliError::new(
                CHANNEL_ERROR,
                format!("{context}: channel I/O error: {source}"),
            ),
        },
        ChannelError::InvalidTarget(_) => CliError::new(USAGE, format!("{context}: {err}")),
        ChannelError::TimedOut(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        ChannelError::Closed => CliError::new(CHANNEL_ERROR, format!("{context}: {err}")),
        ChannelError::LineTooLong { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Encoding(_)
        | FrameError::MalformedCapture { .. }
        | FrameError::TruncatedCapture { .. }
        | FrameError::SampleWidth(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn movie_error(context: &str, err: MovieError) -> CliError {
    match err {
        MovieError::Io(source) => io_error(context, source),
        MovieError::LengthMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        MovieError::NoControllers | MovieError::SlotOutOfRange { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Channel(err) => channel_error(context, err),
        SessionError::Frame(err) => frame_error(context, err),
        SessionError::Movie(err) => movie_error(context, err),
        SessionError::InputExhausted { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}
