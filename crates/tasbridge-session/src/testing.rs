use std::io::{Cursor, Read, Write};

use tasbridge_channel::StreamChannel;
use tasbridge_movie::{Movie, MovieMetadata};

use crate::cancel::CancelToken;

/// Scripted device: replays `input`, records everything written to it.
pub(crate) struct FakeDevice {
    input: Cursor<Vec<u8>>,
    pub(crate) output: Vec<u8>,
    cancel_on_eof: Option<CancelToken>,
}

impl Read for FakeDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.input.read(buf)?;
        if n == 0 {
            if let Some(token) = &self.cancel_on_eof {
                token.cancel();
            }
        }
        Ok(n)
    }
}

impl Write for FakeDevice {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub(crate) fn device(script: &[u8]) -> StreamChannel<FakeDevice> {
    StreamChannel::new(FakeDevice {
        input: Cursor::new(script.to_vec()),
        output: Vec::new(),
        cancel_on_eof: None,
    })
}

/// A device whose script ends with the operator pressing Ctrl-C while the
/// session is blocked in a read.
pub(crate) fn device_interrupted_at_eof(
    script: &[u8],
    cancel: &CancelToken,
) -> StreamChannel<FakeDevice> {
    StreamChannel::new(FakeDevice {
        input: Cursor::new(script.to_vec()),
        output: Vec::new(),
        cancel_on_eof: Some(cancel.clone()),
    })
}

pub(crate) fn written(channel: &StreamChannel<FakeDevice>) -> &[u8] {
    &channel.get_ref().output
}

pub(crate) fn movie(controllers: usize, frames: &[&[u8]]) -> Movie {
    let mut movie = Movie::new(MovieMetadata {
        system: "Nintendo 64".to_string(),
        game: "TEST ROM".to_string(),
        controllers,
        author: String::new(),
        description: String::new(),
    })
    .unwrap();
    for raw in frames {
        movie.write(raw).unwrap();
    }
    movie
}
