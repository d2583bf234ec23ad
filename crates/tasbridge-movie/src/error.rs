/// Errors that can occur when building or filling a movie.
#[derive(Debug, thiserror::Error)]
pub enum MovieError {
    /// A movie needs at least one controller slot.
    #[error("a movie needs at least one controller")]
    NoControllers,

    /// Raw frame data did not match `controllers * sample width`.
    #[error("frame data length mismatch ({actual} bytes, expected {expected})")]
    LengthMismatch { expected: usize, actual: usize },

    /// A controller slot outside `0..controllers` was addressed.
    #[error("controller slot {slot} out of range ({controllers} controllers)")]
    SlotOutOfRange { slot: usize, controllers: usize },

    /// An I/O error occurred while importing or exporting frames.
    #[error("movie I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MovieError>;
