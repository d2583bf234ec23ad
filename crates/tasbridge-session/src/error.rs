use crate::status::SessionReport;

/// Errors that end a session.
///
/// An operator interrupt is not an error: it ends the session with
/// `Ok(SessionReport)`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The byte channel failed or closed.
    #[error("channel error: {0}")]
    Channel(#[from] tasbridge_channel::ChannelError),

    /// A device message could not be decoded or a response encoded.
    #[error("frame error: {0}")]
    Frame(#[from] tasbridge_frame::FrameError),

    /// The movie rejected a frame.
    #[error("movie error: {0}")]
    Movie(#[from] tasbridge_movie::MovieError),

    /// The device asked for samples past the end of the movie.
    #[error("input exhausted at frame {frame}")]
    InputExhausted { frame: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A session that ended on an error, with how far it got.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct SessionFailure {
    pub report: SessionReport,
    #[source]
    pub error: SessionError,
}

/// How a session ended: an operator stop or a failure.
pub type Outcome = std::result::Result<SessionReport, SessionFailure>;
