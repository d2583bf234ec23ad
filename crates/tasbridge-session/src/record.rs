//! Recording: capture what the console reads from a real controller.

use bytes::BytesMut;
use tasbridge_channel::ByteChannel;
use tasbridge_frame::{
    capture_body_len, decode_capture_block, encode_record_select, CaptureBlock, CommandTag,
    InputSample, SessionMode, CAPTURE_HEADER_SIZE,
};
use tasbridge_movie::Movie;
use tracing::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::config::SessionConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Outcome, Result};
use crate::status::{Status, StatusSink};

/// Record the console's controller polls into `movie` until the channel
/// fails or `cancel` is tripped.
///
/// Frames are appended only when complete. Whatever was recorded before
/// the session ended stays in `movie`, on success and on error alike.
pub fn record<C: ByteChannel + ?Sized>(
    channel: &mut C,
    movie: &mut Movie,
    config: &SessionConfig,
    cancel: &CancelToken,
    sink: Option<&mut dyn StatusSink>,
) -> Outcome {
    let mut session = Dispatcher::new(channel, config, cancel, sink, SessionMode::Record);

    let mut init = BytesMut::new();
    encode_record_select(&config.profile, &mut init);
    if let Err(err) = session.init(&init) {
        return session.end(err, movie.frames());
    }

    let mut assembler = FrameAssembler::new(movie.controllers());
    loop {
        match dispatch(&mut session, movie, &mut assembler) {
            Ok(true) => session.completed(),
            Ok(false) => {
                assembler.discard();
                return Ok(session.interrupted(movie.frames()));
            }
            Err(err) => {
                assembler.discard();
                return session.end(err, movie.frames());
            }
        }
    }
}

fn dispatch<C: ByteChannel + ?Sized>(
    session: &mut Dispatcher<'_, '_, C>,
    movie: &mut Movie,
    assembler: &mut FrameAssembler,
) -> Result<bool> {
    let Some(tag) = session.next_tag()? else {
        return Ok(false);
    };

    match tag {
        CommandTag::Log(severity) => {
            let message = session.read_log(severity)?;
            session.notify(&Status {
                movie: &*movie,
                frame: movie.frames(),
                sample: None,
                message: Some(&message),
            });
        }
        CommandTag::CaptureBlock => {
            let block = read_capture(&mut *session.channel)?;
            debug!(
                port = block.port,
                request = %hex::encode(&block.request),
                response = %hex::encode(&block.response),
                "capture block"
            );

            if let Some(frame) = assembler.accept(&block) {
                movie.write_samples(&frame)?;
                session.notify(&Status {
                    movie: &*movie,
                    frame: movie.frames(),
                    sample: frame.last().copied(),
                    message: None,
                });
            }
        }
        CommandTag::FrameRequest => {
            let tag = session.config.profile.frame_request_tag;
            session.unrecognized(tag);
        }
        CommandTag::Unknown(tag) => session.unrecognized(tag),
    }
    Ok(true)
}

/// Read the capture block following a capture tag.
fn read_capture<C: ByteChannel + ?Sized>(channel: &mut C) -> Result<CaptureBlock> {
    let head = channel.read_exact(CAPTURE_HEADER_SIZE)?;
    let header = [head[0], head[1], head[2]];
    let body_len = capture_body_len(header)?;
    let body = channel.read_exact(body_len)?;

    let mut raw = BytesMut::with_capacity(CAPTURE_HEADER_SIZE + body_len);
    raw.extend_from_slice(&header);
    raw.extend_from_slice(&body);
    Ok(decode_capture_block(&raw)?)
}

/// Collects input-poll responses into whole frames.
///
/// A response carrying one sample per controller completes a frame on its
/// own. A single-sample response fills the slot of the port it was polled
/// on; a second poll of the same port before the frame completes replaces
/// the earlier sample.
#[derive(Debug)]
struct FrameAssembler {
    pending: Vec<Option<InputSample>>,
}

impl FrameAssembler {
    fn new(controllers: usize) -> Self {
        Self {
            pending: vec![None; controllers],
        }
    }

    /// Feed one block; returns a frame once every slot holds a sample.
    fn accept(&mut self, block: &CaptureBlock) -> Option<Vec<InputSample>> {
        if !block.is_input_poll() {
            trace!(port = block.port, command = ?block.command(), "not an input poll");
            return None;
        }
        let samples = match block.samples() {
            Ok(samples) => samples,
            Err(err) => {
                warn!(port = block.port, error = %err, "skipping poll response");
                return None;
            }
        };

        let controllers = self.pending.len();
        let port = block.port as usize;
        match samples.as_slice() {
            [sample] if port < controllers => self.pending[port] = Some(*sample),
            [_] => {
                trace!(port, controllers, "poll on unrecorded port");
                return None;
            }
            all if all.len() == controllers => {
                for (slot, sample) in self.pending.iter_mut().zip(all) {
                    *slot = Some(*sample);
                }
            }
            other => {
                warn!(
                    port,
                    samples = other.len(),
                    controllers,
                    "poll response does not match controller count"
                );
                return None;
            }
        }

        if self.pending.iter().all(Option::is_some) {
            Some(self.pending.iter_mut().filter_map(Option::take).collect())
        } else {
            None
        }
    }

    /// Drop a partially assembled frame.
    fn discard(&mut self) {
        let filled = self.pending.iter().filter(|slot| slot.is_some()).count();
        if filled > 0 {
            debug!(filled, "discarding incomplete frame");
        }
        self.pending.iter_mut().for_each(|slot| *slot = None);
    }
}
