use std::fmt;

use serde::Serialize;

use crate::error::{FrameError, Result};

/// Terminator ending every device log line.
pub const LOG_TERMINATOR: u8 = b'\n';

/// Severity of a device log line, encoded in its command tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub const DEBUG_TAG: u8 = 0xFC;
    pub const INFO_TAG: u8 = 0xFD;
    pub const WARN_TAG: u8 = 0xFE;
    pub const ERROR_TAG: u8 = 0xFF;

    /// Severity for a log tag, or `None` if `tag` is not in `0xFC..=0xFF`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            Self::DEBUG_TAG => Some(Self::Debug),
            Self::INFO_TAG => Some(Self::Info),
            Self::WARN_TAG => Some(Self::Warn),
            Self::ERROR_TAG => Some(Self::Error),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Self::Debug => Self::DEBUG_TAG,
            Self::Info => Self::INFO_TAG,
            Self::Warn => Self::WARN_TAG,
            Self::Error => Self::ERROR_TAG,
        }
    }

    /// Fixed-width prefix used when a message is rendered for humans.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Debug => "[DEBUG] ",
            Self::Info => "[INFO]  ",
            Self::Warn => "[WARN]  ",
            Self::Error => "[ERROR] ",
        }
    }
}

/// A log line emitted by the device firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMessage {
    pub severity: Severity,
    pub text: String,
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.severity.prefix(), self.text)
    }
}

/// Decode a log line read after `tag`.
///
/// `raw_line` is the line as read from the channel; one trailing
/// [`LOG_TERMINATOR`] is stripped. Invalid UTF-8 is an error.
pub fn decode_log(tag: u8, raw_line: &[u8]) -> Result<LogMessage> {
    let severity = Severity::from_tag(tag).ok_or(FrameError::NotALogTag(tag))?;
    let text = std::str::from_utf8(strip_terminator(raw_line))?;
    Ok(LogMessage {
        severity,
        text: text.to_string(),
    })
}

/// Like [`decode_log`], but replaces invalid UTF-8 with U+FFFD.
pub fn decode_log_lossy(tag: u8, raw_line: &[u8]) -> Result<LogMessage> {
    let severity = Severity::from_tag(tag).ok_or(FrameError::NotALogTag(tag))?;
    Ok(LogMessage {
        severity,
        text: String::from_utf8_lossy(strip_terminator(raw_line)).into_owned(),
    })
}

fn strip_terminator(raw_line: &[u8]) -> &[u8] {
    raw_line.strip_suffix(&[LOG_TERMINATOR]).unwrap_or(raw_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_severity() {
        let cases = [
            (0xFC, Severity::Debug, "[DEBUG] "),
            (0xFD, Severity::Info, "[INFO]  "),
            (0xFE, Severity::Warn, "[WARN]  "),
            (0xFF, Severity::Error, "[ERROR] "),
        ];
        for (tag, severity, prefix) in cases {
            let msg = decode_log(tag, b"DEVICE_INIT N64\n").unwrap();
            assert_eq!(msg.severity, severity);
            assert_eq!(msg.text, "DEVICE_INIT N64");
            assert_eq!(msg.to_string(), format!("{prefix}DEVICE_INIT N64"));
            assert_eq!(severity.tag(), tag);
        }
    }

    #[test]
    fn strips_only_one_terminator() {
        let msg = decode_log(0xFD, b"two\n\n").unwrap();
        assert_eq!(msg.text, "two\n");

        let msg = decode_log(0xFD, b"").unwrap();
        assert_eq!(msg.text, "");
    }

    #[test]
    fn invalid_utf8_propagates() {
        let err = decode_log(0xFE, b"bad \xff\xfe\n").unwrap_err();
        assert!(matches!(err, FrameError::Encoding(_)));
    }

    #[test]
    fn lossy_decode_substitutes() {
        let msg = decode_log_lossy(0xFE, b"bad \xff\n").unwrap();
        assert_eq!(msg.text, "bad \u{FFFD}");
    }

    #[test]
    fn rejects_non_log_tag() {
        let err = decode_log(0xD0, b"x\n").unwrap_err();
        assert!(matches!(err, FrameError::NotALogTag(0xD0)));
    }
}
