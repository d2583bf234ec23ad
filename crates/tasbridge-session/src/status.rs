use tasbridge_frame::{InputSample, LogMessage};
use tasbridge_movie::Movie;

/// Progress snapshot handed to a [`StatusSink`] after a dispatched command.
#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    pub movie: &'a Movie,
    /// Playback cursor, or frames recorded so far.
    pub frame: usize,
    /// Last sample sent (playback) or captured (recording).
    pub sample: Option<InputSample>,
    /// Device log line, when the command was a log message.
    pub message: Option<&'a LogMessage>,
}

/// Receives progress from a running session.
///
/// Called synchronously on the session thread, at most once per command.
/// A sink that blocks stalls the protocol loop.
pub trait StatusSink {
    fn on_status(&mut self, status: &Status<'_>);
}

impl<F> StatusSink for F
where
    F: FnMut(&Status<'_>),
{
    fn on_status(&mut self, status: &Status<'_>) {
        self(status)
    }
}

/// State a session was in when it ended.
///
/// Initialization either succeeds or fails the channel, so a session never
/// ends while still initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A command could not be handled. The channel was still usable.
    Dispatching,
    /// The channel failed or closed.
    ChannelClosed,
    /// The operator stopped the session.
    Interrupted,
}

/// Summary of a finished session, whichever way it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub state: SessionState,
    /// Playback cursor or recorded frame count when the session ended.
    pub frame: usize,
    /// Commands fully dispatched, including unrecognized ones.
    pub commands: u64,
    /// Commands with an unrecognized tag.
    pub unrecognized: u64,
}
