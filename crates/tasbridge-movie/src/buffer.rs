use tasbridge_frame::{InputSample, SAMPLE_WIDTH};

use crate::error::{MovieError, Result};

/// Per-controller input samples, one per frame.
///
/// Every slot owns its own sequence and all sequences always have the same
/// length: a write either appends to every slot or to none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    slots: Vec<Vec<InputSample>>,
}

impl InputBuffer {
    /// Create an empty buffer with `controllers` slots.
    pub fn new(controllers: usize) -> Result<Self> {
        if controllers == 0 {
            return Err(MovieError::NoControllers);
        }
        Ok(Self {
            slots: (0..controllers).map(|_| Vec::new()).collect(),
        })
    }

    pub fn controllers(&self) -> usize {
        self.slots.len()
    }

    /// Number of complete frames held.
    pub fn frames(&self) -> usize {
        self.slots.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Bytes of raw data making up one frame.
    pub fn frame_width(&self) -> usize {
        self.controllers() * SAMPLE_WIDTH
    }

    /// Append one frame from raw bytes laid out slot by slot.
    pub fn write(&mut self, raw: &[u8]) -> Result<()> {
        let expected = self.frame_width();
        if raw.len() != expected {
            return Err(MovieError::LengthMismatch {
                expected,
                actual: raw.len(),
            });
        }

        for (slot, chunk) in self.slots.iter_mut().zip(raw.chunks_exact(SAMPLE_WIDTH)) {
            // chunks_exact guarantees the width
            if let Some(sample) = InputSample::from_slice(chunk) {
                slot.push(sample);
            }
        }
        Ok(())
    }

    /// Append one frame from one sample per slot, in slot order.
    pub fn write_samples(&mut self, samples: &[InputSample]) -> Result<()> {
        if samples.len() != self.controllers() {
            return Err(MovieError::LengthMismatch {
                expected: self.frame_width(),
                actual: samples.len() * SAMPLE_WIDTH,
            });
        }

        for (slot, sample) in self.slots.iter_mut().zip(samples) {
            slot.push(*sample);
        }
        Ok(())
    }

    /// Up to `count` samples of `slot` starting at frame `start`.
    ///
    /// Reading past the end yields fewer samples, never an error.
    pub fn slice(&self, slot: usize, start: usize, count: usize) -> Result<&[InputSample]> {
        let samples = self.slot(slot)?;
        let start = start.min(samples.len());
        let end = start.saturating_add(count).min(samples.len());
        Ok(&samples[start..end])
    }

    /// Every sample recorded for `slot`.
    pub fn slot(&self, slot: usize) -> Result<&[InputSample]> {
        self.slots
            .get(slot)
            .map(Vec::as_slice)
            .ok_or_else(|| MovieError::SlotOutOfRange {
                slot,
                controllers: self.controllers(),
            })
    }

    /// All slots' samples for one frame, in slot order.
    pub fn frame(&self, index: usize) -> Option<Vec<InputSample>> {
        self.slots.iter().map(|slot| slot.get(index).copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame(controllers: usize, seed: u8) -> Vec<u8> {
        (0..controllers * SAMPLE_WIDTH)
            .map(|i| seed.wrapping_add(i as u8))
            .collect()
    }

    #[test]
    fn rejects_zero_controllers() {
        assert!(matches!(InputBuffer::new(0), Err(MovieError::NoControllers)));
    }

    #[test]
    fn every_write_lengthens_every_slot() {
        for controllers in 1..=4 {
            let mut buffer = InputBuffer::new(controllers).unwrap();
            for n in 1..=7u8 {
                buffer.write(&raw_frame(controllers, n)).unwrap();
                assert_eq!(buffer.frames(), n as usize);
                for slot in 0..controllers {
                    assert_eq!(buffer.slot(slot).unwrap().len(), n as usize);
                }
            }
        }
    }

    #[test]
    fn write_splits_raw_in_slot_order() {
        let mut buffer = InputBuffer::new(2).unwrap();
        buffer.write(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        assert_eq!(buffer.slot(0).unwrap(), &[InputSample::new([1, 2, 3, 4])]);
        assert_eq!(buffer.slot(1).unwrap(), &[InputSample::new([5, 6, 7, 8])]);
    }

    #[test]
    fn slots_do_not_alias() {
        let mut buffer = InputBuffer::new(3).unwrap();
        buffer.write(&raw_frame(3, 0)).unwrap();
        buffer.write(&raw_frame(3, 100)).unwrap();

        assert_eq!(buffer.slot(0).unwrap().len(), 2);
        assert_ne!(buffer.slot(0).unwrap(), buffer.slot(1).unwrap());
        assert_ne!(buffer.slot(1).unwrap(), buffer.slot(2).unwrap());
    }

    #[test]
    fn length_mismatch_leaves_buffer_untouched() {
        let mut buffer = InputBuffer::new(2).unwrap();
        buffer.write(&raw_frame(2, 0)).unwrap();

        let err = buffer.write(&[0; 6]).unwrap_err();
        assert!(matches!(
            err,
            MovieError::LengthMismatch {
                expected: 8,
                actual: 6
            }
        ));
        assert_eq!(buffer.frames(), 1);
        assert_eq!(buffer.slot(1).unwrap().len(), 1);

        let err = buffer.write_samples(&[InputSample::NEUTRAL]).unwrap_err();
        assert!(matches!(err, MovieError::LengthMismatch { .. }));
        assert_eq!(buffer.frames(), 1);
    }

    #[test]
    fn slice_truncates_past_end() {
        let mut buffer = InputBuffer::new(1).unwrap();
        for n in 0..3u8 {
            buffer.write(&[n; 4]).unwrap();
        }

        assert_eq!(buffer.slice(0, 0, 2).unwrap().len(), 2);
        assert_eq!(buffer.slice(0, 2, 5).unwrap(), &[InputSample::new([2; 4])]);
        assert!(buffer.slice(0, 3, 2).unwrap().is_empty());
        assert!(buffer.slice(0, 10, 2).unwrap().is_empty());
        assert_eq!(buffer.slice(0, 1, usize::MAX).unwrap().len(), 2);
    }

    #[test]
    fn slice_unknown_slot() {
        let buffer = InputBuffer::new(1).unwrap();
        let err = buffer.slice(1, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            MovieError::SlotOutOfRange {
                slot: 1,
                controllers: 1
            }
        ));
    }

    #[test]
    fn frame_collects_across_slots() {
        let mut buffer = InputBuffer::new(2).unwrap();
        buffer
            .write_samples(&[InputSample::new([1; 4]), InputSample::new([2; 4])])
            .unwrap();

        assert_eq!(
            buffer.frame(0),
            Some(vec![InputSample::new([1; 4]), InputSample::new([2; 4])])
        );
        assert_eq!(buffer.frame(1), None);
    }
}
