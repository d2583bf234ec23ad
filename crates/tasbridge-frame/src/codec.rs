use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::profile::{DeviceProfile, SessionMode, CONFIG_BLOCK_SIZE};
use crate::sample::{InputSample, SAMPLE_WIDTH};

/// Capture header: port (1) + size (1) + request size (1).
pub const CAPTURE_HEADER_SIZE: usize = 3;

/// Largest sample count whose byte length fits the one-byte length field.
pub const MAX_RESPONSE_SAMPLES: usize = u8::MAX as usize / SAMPLE_WIDTH;

/// Console command byte asking a controller for its inputs.
pub const POLL_INPUTS: u8 = 0x01;

/// Encode the playback initialization sequence.
///
/// Wire format:
/// ```text
/// ┌────────┬──────────┬──────┬────────────┬──────────────────────────┐
/// │ select │ tag (3B) │ mode │ config tag │ 4x [connected][hdr (3B)] │
/// │ 0x80   │ "N64"    │ 0x03 │ 0xD1       │ 16 bytes                 │
/// └────────┴──────────┴──────┴────────────┴──────────────────────────┘
/// ```
/// The device does not acknowledge it.
pub fn encode_config_block(profile: &DeviceProfile, dst: &mut BytesMut) {
    dst.reserve(6 + CONFIG_BLOCK_SIZE);
    put_select(profile, SessionMode::Playback, dst);
    dst.put_u8(profile.controller_config_tag);
    for port in &profile.ports {
        dst.put_u8(u8::from(port.connected));
        dst.put_slice(&port.header);
    }
}

/// Encode the record initialization sequence: select, tag, record mode.
pub fn encode_record_select(profile: &DeviceProfile, dst: &mut BytesMut) {
    dst.reserve(5);
    put_select(profile, SessionMode::Record, dst);
}

fn put_select(profile: &DeviceProfile, mode: SessionMode, dst: &mut BytesMut) {
    dst.put_u8(profile.device_select);
    dst.put_slice(&profile.system_tag);
    dst.put_u8(profile.mode_byte(mode));
}

/// Number of samples a frame request asks for.
///
/// The device sends the number of free bytes in its buffer; anything short
/// of a whole sample is dropped (`0x09` asks for 2 samples, not 3).
pub fn decode_frame_request(byte: u8) -> usize {
    byte as usize / SAMPLE_WIDTH
}

/// Encode a frame response: `[tag][byte length][samples...]`.
pub fn encode_frame_response(
    tag: u8,
    samples: &[InputSample],
    dst: &mut BytesMut,
) -> Result<()> {
    if samples.len() > MAX_RESPONSE_SAMPLES {
        return Err(FrameError::ResponseTooLarge {
            samples: samples.len(),
            max: MAX_RESPONSE_SAMPLES,
        });
    }
    let len = samples.len() * SAMPLE_WIDTH;
    dst.reserve(2 + len);
    dst.put_u8(tag);
    dst.put_u8(len as u8);
    for sample in samples {
        dst.put_slice(sample.as_bytes());
    }
    Ok(())
}

/// One console/controller exchange observed by the device while recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureBlock {
    /// Controller port the exchange happened on.
    pub port: u8,
    /// Bytes sent by the console, starting with the command byte.
    pub request: Bytes,
    /// Bytes the controller answered with.
    pub response: Bytes,
}

impl CaptureBlock {
    /// Console command byte, if the request is not empty.
    pub fn command(&self) -> Option<u8> {
        self.request.first().copied()
    }

    /// Whether this exchange is the console polling controller inputs.
    pub fn is_input_poll(&self) -> bool {
        self.command() == Some(POLL_INPUTS)
    }

    /// Split the response into samples, in slot order.
    pub fn samples(&self) -> Result<Vec<InputSample>> {
        if self.response.len() % SAMPLE_WIDTH != 0 {
            return Err(FrameError::SampleWidth(self.response.len()));
        }
        Ok(self
            .response
            .chunks_exact(SAMPLE_WIDTH)
            .filter_map(InputSample::from_slice)
            .collect())
    }
}

/// Number of body bytes following a capture header.
pub fn capture_body_len(header: [u8; CAPTURE_HEADER_SIZE]) -> Result<usize> {
    let [_, size, request_size] = header;
    if request_size > size {
        return Err(FrameError::MalformedCapture { size, request_size });
    }
    Ok(size as usize)
}

/// Decode a complete capture block.
///
/// Wire format (after the capture tag):
/// ```text
/// ┌──────┬──────┬──────────────┬──────────────────────┬───────────────────────────┐
/// │ port │ size │ request size │ request (req. size)  │ response (size - req.)    │
/// └──────┴──────┴──────────────┴──────────────────────┴───────────────────────────┘
/// ```
pub fn decode_capture_block(src: &[u8]) -> Result<CaptureBlock> {
    if src.len() < CAPTURE_HEADER_SIZE {
        return Err(FrameError::TruncatedCapture {
            expected: CAPTURE_HEADER_SIZE,
            actual: src.len(),
        });
    }
    let header = [src[0], src[1], src[2]];
    let body_len = capture_body_len(header)?;
    let expected = CAPTURE_HEADER_SIZE + body_len;
    if src.len() < expected {
        return Err(FrameError::TruncatedCapture {
            expected,
            actual: src.len(),
        });
    }

    let request_end = CAPTURE_HEADER_SIZE + header[2] as usize;
    Ok(CaptureBlock {
        port: header[0],
        request: Bytes::copy_from_slice(&src[CAPTURE_HEADER_SIZE..request_end]),
        response: Bytes::copy_from_slice(&src[request_end..expected]),
    })
}

#[cfg(test)]
pub(crate) fn decode_frame_response(src: &[u8]) -> Option<(u8, Vec<InputSample>)> {
    let (&tag, rest) = src.split_first()?;
    let (&len, rest) = rest.split_first()?;
    let body = rest.get(..len as usize)?;
    if body.len() % SAMPLE_WIDTH != 0 {
        return None;
    }
    let samples = body
        .chunks_exact(SAMPLE_WIDTH)
        .filter_map(InputSample::from_slice)
        .collect();
    Some((tag, samples))
}
