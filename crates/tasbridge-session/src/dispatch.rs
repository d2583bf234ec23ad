use tasbridge_channel::ByteChannel;
use tasbridge_frame::{
    decode_log, decode_log_lossy, CommandTag, LogMessage, SessionMode, Severity, LOG_TERMINATOR,
};
use tracing::{debug, error, info, warn};

use crate::cancel::CancelToken;
use crate::config::SessionConfig;
use crate::error::{Outcome, Result, SessionError, SessionFailure};
use crate::status::{SessionReport, SessionState, Status, StatusSink};

/// State shared by the playback and record loops.
pub(crate) struct Dispatcher<'a, 's, C: ?Sized> {
    pub(crate) channel: &'a mut C,
    pub(crate) config: &'a SessionConfig,
    cancel: &'a CancelToken,
    sink: Option<&'s mut dyn StatusSink>,
    mode: SessionMode,
    commands: u64,
    unrecognized: u64,
}

impl<'a, 's, C: ByteChannel + ?Sized> Dispatcher<'a, 's, C> {
    pub(crate) fn new(
        channel: &'a mut C,
        config: &'a SessionConfig,
        cancel: &'a CancelToken,
        sink: Option<&'s mut dyn StatusSink>,
        mode: SessionMode,
    ) -> Self {
        Self {
            channel,
            config,
            cancel,
            sink,
            mode,
            commands: 0,
            unrecognized: 0,
        }
    }

    /// Send the initialization sequence and start dispatching.
    pub(crate) fn init(&mut self, sequence: &[u8]) -> Result<()> {
        debug!(mode = ?self.mode, bytes = sequence.len(), "sending init sequence");
        self.channel.write_all(sequence)?;
        info!(
            mode = ?self.mode,
            system = %self.config.profile.system_name,
            ports = self.config.profile.connected_ports(),
            "session started"
        );
        Ok(())
    }

    /// Read and classify the next command tag.
    ///
    /// Returns `None` once a stop has been requested.
    pub(crate) fn next_tag(&mut self) -> Result<Option<CommandTag>> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        let tag = self.channel.read_byte()?;
        Ok(Some(self.config.profile.classify(tag, self.mode)))
    }

    /// Read the rest of a log line and re-emit it through tracing.
    pub(crate) fn read_log(&mut self, severity: Severity) -> Result<LogMessage> {
        let line = self.channel.read_until(LOG_TERMINATOR)?;
        let message = if self.config.lossy_log_text {
            decode_log_lossy(severity.tag(), &line)?
        } else {
            decode_log(severity.tag(), &line)?
        };
        emit_device_log(&message);
        Ok(message)
    }

    /// Report a tag this mode has no handler for. Never fatal.
    pub(crate) fn unrecognized(&mut self, tag: u8) {
        self.unrecognized += 1;
        warn!(tag = %format_args!("0x{tag:02x}"), mode = ?self.mode, "unrecognized command");
    }

    /// Mark one command as fully processed.
    pub(crate) fn completed(&mut self) {
        self.commands += 1;
    }

    pub(crate) fn notify(&mut self, status: &Status<'_>) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_status(status);
        }
    }

    fn report(&self, state: SessionState, frame: usize) -> SessionReport {
        SessionReport {
            state,
            frame,
            commands: self.commands,
            unrecognized: self.unrecognized,
        }
    }

    /// Report for a session stopped by the operator.
    pub(crate) fn interrupted(&mut self, frame: usize) -> SessionReport {
        info!(
            frame,
            commands = self.commands,
            unrecognized = self.unrecognized,
            "session interrupted"
        );
        self.report(SessionState::Interrupted, frame)
    }

    /// Decide how a failed command ends the session.
    ///
    /// A channel failure after a stop request is the stop itself: the
    /// command it cut short had not been applied yet.
    pub(crate) fn end(&mut self, err: SessionError, frame: usize) -> Outcome {
        let state = match err {
            SessionError::Channel(_) if self.cancel.is_cancelled() => {
                return Ok(self.interrupted(frame));
            }
            SessionError::Channel(_) => SessionState::ChannelClosed,
            _ => SessionState::Dispatching,
        };
        error!(frame, commands = self.commands, ?state, error = %err, "session failed");
        Err(SessionFailure {
            report: self.report(state, frame),
            error: err,
        })
    }
}

fn emit_device_log(message: &LogMessage) {
    let text = message.text.as_str();
    match message.severity {
        Severity::Debug => debug!(target: "device", "{text}"),
        Severity::Info => info!(target: "device", "{text}"),
        Severity::Warn => warn!(target: "device", "{text}"),
        Severity::Error => error!(target: "device", "{text}"),
    }
}
