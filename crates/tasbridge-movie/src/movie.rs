use std::fmt;
use std::io::{ErrorKind, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::InputBuffer;
use crate::error::{MovieError, Result};

/// Descriptive movie information. Never affects the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    /// Console name, e.g. "Nintendo 64".
    pub system: String,
    /// Game (ROM) identifier.
    pub game: String,
    /// Number of controller slots, at least one.
    pub controllers: usize,
    pub author: String,
    pub description: String,
}

impl MovieMetadata {
    /// Label/value pairs for every non-empty field, in display order.
    pub fn describe(&self) -> Vec<(&'static str, &str)> {
        [
            ("System:", self.system.as_str()),
            ("ROM:", self.game.as_str()),
            ("Author:", self.author.as_str()),
            ("Desc:", self.description.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// A recorded or to-be-replayed sequence of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    metadata: MovieMetadata,
    inputs: InputBuffer,
}

impl Movie {
    /// Create an empty movie sized for `metadata.controllers`.
    pub fn new(metadata: MovieMetadata) -> Result<Self> {
        let inputs = InputBuffer::new(metadata.controllers)?;
        Ok(Self { metadata, inputs })
    }

    pub fn metadata(&self) -> &MovieMetadata {
        &self.metadata
    }

    pub fn inputs(&self) -> &InputBuffer {
        &self.inputs
    }

    pub fn controllers(&self) -> usize {
        self.inputs.controllers()
    }

    pub fn frames(&self) -> usize {
        self.inputs.frames()
    }

    /// Append one frame of raw bytes, `controllers * 4` long.
    pub fn write(&mut self, raw: &[u8]) -> Result<()> {
        self.inputs.write(raw)
    }

    /// Append one frame of samples, one per controller.
    pub fn write_samples(&mut self, samples: &[tasbridge_frame::InputSample]) -> Result<()> {
        self.inputs.write_samples(samples)
    }

    /// Write the human-readable summary, one line per non-empty field.
    pub fn print_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{self}")
    }

    /// Print the summary to stdout.
    pub fn print(&self) {
        print!("{self}");
    }

    /// Load frames from a raw dump: `controllers * 4` bytes per frame, no header.
    pub fn import_raw<R: Read>(metadata: MovieMetadata, reader: &mut R) -> Result<Self> {
        let mut movie = Self::new(metadata)?;
        let mut frame = vec![0u8; movie.inputs.frame_width()];
        loop {
            let filled = read_frame(reader, &mut frame)?;
            if filled == 0 {
                break;
            }
            if filled < frame.len() {
                return Err(MovieError::LengthMismatch {
                    expected: frame.len(),
                    actual: filled,
                });
            }
            movie.write(&frame)?;
        }
        debug!(frames = movie.frames(), "imported raw movie");
        Ok(movie)
    }

    /// Write frames as a raw dump, the inverse of [`Movie::import_raw`].
    pub fn export_raw<W: Write>(&self, writer: &mut W) -> Result<()> {
        for index in 0..self.frames() {
            if let Some(samples) = self.inputs.frame(index) {
                for sample in samples {
                    writer.write_all(sample.as_bytes())?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.metadata.describe() {
            writeln!(f, "{label:<8} {value}")?;
        }
        Ok(())
    }
}

/// Fill `buf` from `reader`, returning how many bytes arrived before EOF.
fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(MovieError::Io(err)),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tasbridge_frame::InputSample;

    use super::*;

    fn metadata(description: &str) -> MovieMetadata {
        MovieMetadata {
            system: "Nintendo 64".to_string(),
            game: "SUPER MARIO 64".to_string(),
            controllers: 1,
            author: "rs".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn summary_lists_all_fields_in_order() {
        let movie = Movie::new(metadata("any% 16 star")).unwrap();
        let mut out = Vec::new();
        movie.print_summary(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "System:  Nintendo 64",
                "ROM:     SUPER MARIO 64",
                "Author:  rs",
                "Desc:    any% 16 star",
            ]
        );
    }

    #[test]
    fn summary_omits_empty_description() {
        let movie = Movie::new(metadata("")).unwrap();
        let text = movie.to_string();

        assert_eq!(text.lines().count(), 3);
        assert!(!text.contains("Desc:"));
    }

    #[test]
    fn summary_of_blank_metadata_is_empty() {
        let movie = Movie::new(MovieMetadata {
            system: String::new(),
            game: String::new(),
            controllers: 2,
            author: String::new(),
            description: String::new(),
        })
        .unwrap();
        assert!(movie.to_string().is_empty());
    }

    #[test]
    fn frames_follow_writes() {
        let mut movie = Movie::new(metadata("")).unwrap();
        assert_eq!(movie.frames(), 0);

        movie.write(&[1, 2, 3, 4]).unwrap();
        movie.write_samples(&[InputSample::NEUTRAL]).unwrap();
        assert_eq!(movie.frames(), 2);
        assert!(movie.write(&[1, 2, 3]).is_err());
        assert_eq!(movie.frames(), 2);
    }

    #[test]
    fn raw_dump_roundtrip() {
        let mut meta = metadata("");
        meta.controllers = 2;
        let mut movie = Movie::new(meta.clone()).unwrap();
        movie.write(&[1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
        movie.write(&[3, 3, 3, 3, 4, 4, 4, 4]).unwrap();

        let mut dump = Vec::new();
        movie.export_raw(&mut dump).unwrap();
        assert_eq!(dump.len(), 16);

        let loaded = Movie::import_raw(meta, &mut Cursor::new(dump)).unwrap();
        assert_eq!(loaded, movie);
    }

    #[test]
    fn raw_dump_with_partial_frame_is_rejected() {
        let err = Movie::import_raw(metadata(""), &mut Cursor::new(vec![0u8; 6])).unwrap_err();
        assert!(matches!(
            err,
            MovieError::LengthMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn metadata_serializes() {
        let json = serde_json::to_value(metadata("tas")).unwrap();
        assert_eq!(json["system"], "Nintendo 64");
        assert_eq!(json["controllers"], 1);
    }
}
