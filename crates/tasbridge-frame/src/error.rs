/// Errors that can occur while encoding or decoding device messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A device log line was not valid UTF-8.
    #[error("log message is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// A log decode was attempted for a tag outside the log range.
    #[error("tag 0x{0:02x} is not a log tag")]
    NotALogTag(u8),

    /// A frame response would not fit its one-byte length field.
    #[error("frame response too large ({samples} samples, max {max})")]
    ResponseTooLarge { samples: usize, max: usize },

    /// A capture header declared a request longer than the whole block.
    #[error("malformed capture block (size {size}, request size {request_size})")]
    MalformedCapture { size: u8, request_size: u8 },

    /// A capture block buffer ended before its declared size.
    #[error("truncated capture block ({actual} bytes, expected {expected})")]
    TruncatedCapture { expected: usize, actual: usize },

    /// Raw sample data was not a whole number of samples.
    #[error("sample data length {0} is not a multiple of the sample width")]
    SampleWidth(usize),
}

pub type Result<T> = std::result::Result<T, FrameError>;
