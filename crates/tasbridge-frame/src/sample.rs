use std::fmt;

/// Bytes per controller per frame.
pub const SAMPLE_WIDTH: usize = 4;

/// One controller's state for one frame.
///
/// Opaque to the protocol: the bytes are forwarded exactly as recorded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputSample([u8; SAMPLE_WIDTH]);

impl InputSample {
    /// A sample with every byte zero (no buttons, centered stick).
    pub const NEUTRAL: InputSample = InputSample([0; SAMPLE_WIDTH]);

    pub const fn new(bytes: [u8; SAMPLE_WIDTH]) -> Self {
        Self(bytes)
    }

    /// Build a sample from a slice of exactly [`SAMPLE_WIDTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; SAMPLE_WIDTH] = bytes.try_into().ok()?;
        Some(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; SAMPLE_WIDTH] {
        &self.0
    }
}

impl From<[u8; SAMPLE_WIDTH]> for InputSample {
    fn from(bytes: [u8; SAMPLE_WIDTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for InputSample {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for InputSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for InputSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputSample({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_requires_exact_width() {
        assert_eq!(
            InputSample::from_slice(&[1, 2, 3, 4]),
            Some(InputSample::new([1, 2, 3, 4]))
        );
        assert_eq!(InputSample::from_slice(&[1, 2, 3]), None);
        assert_eq!(InputSample::from_slice(&[1, 2, 3, 4, 5]), None);
    }

    #[test]
    fn displays_as_hex() {
        let sample = InputSample::new([0x80, 0x00, 0x7f, 0x0a]);
        assert_eq!(sample.to_string(), "80007f0a");
        assert_eq!(format!("{sample:?}"), "InputSample(80007f0a)");
    }
}
