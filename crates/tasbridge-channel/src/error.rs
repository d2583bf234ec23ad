use std::time::Duration;

/// Errors that can occur on the byte channel.
///
/// Every variant is terminal for a session: the protocol has no retries.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to open the device target.
    #[error("failed to open {target}: {source}")]
    Open {
        target: String,
        source: std::io::Error,
    },

    /// The device target string could not be understood.
    #[error("invalid device target: {0}")]
    InvalidTarget(String),

    /// An I/O error occurred on the underlying stream.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream reached EOF before the requested bytes arrived.
    #[error("channel closed")]
    Closed,

    /// A line grew past the configured limit without a delimiter.
    #[error("line exceeds {max} bytes without a terminator")]
    LineTooLong { max: usize },

    /// A blocking read or write exceeded the configured timeout.
    #[error("channel timed out after {0:?}")]
    TimedOut(Duration),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
