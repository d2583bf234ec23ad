//! Playback: feed a movie to the device one frame request at a time.

use bytes::BytesMut;
use tasbridge_channel::ByteChannel;
use tasbridge_frame::{
    decode_frame_request, encode_config_block, encode_frame_response, CommandTag, InputSample,
    SessionMode,
};
use tasbridge_movie::{InputBuffer, Movie};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::{ExhaustionPolicy, SessionConfig};
use crate::dispatch::Dispatcher;
use crate::error::{Outcome, Result, SessionError};
use crate::status::{Status, StatusSink};

/// Controller slot fed to the device. The firmware only requests one stream.
pub const DRIVEN_SLOT: usize = 0;

/// Play `movie` back through `channel` until the channel fails or `cancel`
/// is tripped.
///
/// The configuration block is written first and never acknowledged. After
/// that every command is handled in full before the next tag is read, and a
/// stop request is honoured only between commands.
///
/// Returns `Ok` only for an operator stop. A closed channel is an error even
/// after the whole movie has been sent: the device decides when playback is
/// over. Either way the report says where the session stopped.
pub fn play<C: ByteChannel + ?Sized>(
    channel: &mut C,
    movie: &Movie,
    config: &SessionConfig,
    cancel: &CancelToken,
    sink: Option<&mut dyn StatusSink>,
) -> Outcome {
    let mut session = Dispatcher::new(channel, config, cancel, sink, SessionMode::Playback);

    let mut init = BytesMut::new();
    encode_config_block(&config.profile, &mut init);
    if let Err(err) = session.init(&init) {
        return session.end(err, 0);
    }

    let mut feed = Feed::new(movie.inputs(), config.exhaustion);
    loop {
        match dispatch(&mut session, movie, &mut feed) {
            Ok(true) => session.completed(),
            Ok(false) => return Ok(session.interrupted(feed.frame)),
            Err(err) => return session.end(err, feed.frame),
        }
    }
}

/// Handle one command. `Ok(false)` means a stop was requested.
fn dispatch<C: ByteChannel + ?Sized>(
    session: &mut Dispatcher<'_, '_, C>,
    movie: &Movie,
    feed: &mut Feed<'_>,
) -> Result<bool> {
    let Some(tag) = session.next_tag()? else {
        return Ok(false);
    };

    match tag {
        CommandTag::Log(severity) => {
            let message = session.read_log(severity)?;
            session.notify(&Status {
                movie,
                frame: feed.frame,
                sample: None,
                message: Some(&message),
            });
        }
        CommandTag::FrameRequest => {
            let requested = session.channel.read_byte()?;
            let samples = feed.take(decode_frame_request(requested))?;

            let mut response = BytesMut::new();
            encode_frame_response(
                session.config.profile.frame_response_tag,
                &samples,
                &mut response,
            )?;
            session.channel.write_all(&response)?;
            debug!(
                requested,
                samples = samples.len(),
                frame = feed.frame,
                "sent frame response"
            );

            session.notify(&Status {
                movie,
                frame: feed.frame,
                sample: samples.last().copied(),
                message: None,
            });
        }
        CommandTag::CaptureBlock => {
            let tag = session.config.profile.capture_tag;
            session.unrecognized(tag);
        }
        CommandTag::Unknown(tag) => session.unrecognized(tag),
    }
    Ok(true)
}

/// Read cursor over the driven slot.
struct Feed<'m> {
    inputs: &'m InputBuffer,
    policy: ExhaustionPolicy,
    /// Next frame to send.
    frame: usize,
    exhausted: bool,
}

impl<'m> Feed<'m> {
    fn new(inputs: &'m InputBuffer, policy: ExhaustionPolicy) -> Self {
        Self {
            inputs,
            policy,
            frame: 0,
            exhausted: false,
        }
    }

    /// Up to `count` samples from the cursor, then advance it by `count`.
    ///
    /// Near the end of the movie fewer samples come back. Only a request
    /// that finds nothing left falls back to the exhaustion policy.
    fn take(&mut self, count: usize) -> Result<Vec<InputSample>> {
        let mut samples = self.inputs.slice(DRIVEN_SLOT, self.frame, count)?.to_vec();

        if count > 0 && samples.is_empty() {
            let fill = match self.policy {
                ExhaustionPolicy::Fail => {
                    return Err(SessionError::InputExhausted { frame: self.frame });
                }
                ExhaustionPolicy::RepeatLast => self
                    .inputs
                    .slot(DRIVEN_SLOT)?
                    .last()
                    .copied()
                    .unwrap_or(InputSample::NEUTRAL),
                ExhaustionPolicy::Neutral => InputSample::NEUTRAL,
            };
            if !self.exhausted {
                self.exhausted = true;
                warn!(frame = self.frame, policy = ?self.policy, "movie exhausted, padding");
            }
            samples = vec![fill; count];
        }

        self.frame += count;
        Ok(samples)
    }
}
