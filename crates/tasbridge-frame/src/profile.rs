//! Device profiles.
//!
//! A profile pins down every firmware-defined byte value: how the console is
//! selected, which mode bytes start playback or recording, what the
//! controller-configuration block holds, and which tags carry frame data.

use crate::log::Severity;

/// Controller ports exposed by the device.
pub const PORT_COUNT: usize = 4;

/// Size of the controller-configuration block: one connected flag and a
/// three-byte identity header per port.
pub const CONFIG_BLOCK_SIZE: usize = PORT_COUNT * 4;

/// Configuration for one controller port on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerPort {
    /// Whether the device answers the console on this port.
    pub connected: bool,
    /// Identity header returned to the console's identify/reset commands.
    pub header: [u8; 3],
}

impl ControllerPort {
    /// Standard controller with a pak inserted.
    pub const STANDARD: ControllerPort = ControllerPort {
        connected: true,
        header: [0x05, 0x00, 0x02],
    };

    pub const DISCONNECTED: ControllerPort = ControllerPort {
        connected: false,
        header: [0x00, 0x00, 0x00],
    };
}

/// Which side owns the input stream in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Host feeds recorded samples to the device.
    Playback,
    /// Device reports what the console saw.
    Record,
}

/// How a command tag is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTag {
    Log(Severity),
    FrameRequest,
    CaptureBlock,
    Unknown(u8),
}

/// Byte values for one device firmware revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Human-readable console name.
    pub system_name: String,
    /// Byte announcing a console selection.
    pub device_select: u8,
    /// ASCII console identifier sent after `device_select`.
    pub system_tag: [u8; 3],
    pub playback_mode: u8,
    pub record_mode: u8,
    /// Host command carrying the controller-configuration block.
    pub controller_config_tag: u8,
    pub ports: [ControllerPort; PORT_COUNT],
    /// Device asks for playback samples (device to host).
    pub frame_request_tag: u8,
    /// Host answers a frame request (host to device).
    pub frame_response_tag: u8,
    /// Device delivers a captured exchange (device to host).
    pub capture_tag: u8,
    /// Query answered with a one-line device description.
    pub describe_query: u8,
    /// Query answered with a one-line firmware version.
    pub version_query: u8,
}

impl DeviceProfile {
    /// Nintendo 64 datastream firmware.
    pub fn n64() -> Self {
        Self {
            system_name: "Nintendo 64".to_string(),
            device_select: 0x80,
            system_tag: *b"N64",
            playback_mode: 0x03,
            record_mode: 0x01,
            controller_config_tag: 0xD1,
            ports: [
                ControllerPort::STANDARD,
                ControllerPort::DISCONNECTED,
                ControllerPort::DISCONNECTED,
                ControllerPort::DISCONNECTED,
            ],
            frame_request_tag: 0xD0,
            frame_response_tag: 0xD0,
            capture_tag: 0xB0,
            describe_query: b'd',
            version_query: b'v',
        }
    }

    /// Classify a command tag received from the device.
    ///
    /// Log tags always win. The frame-bearing tag depends on the mode: a
    /// capture tag during playback (or a frame request while recording) is
    /// unrecognized.
    pub fn classify(&self, tag: u8, mode: SessionMode) -> CommandTag {
        if let Some(severity) = Severity::from_tag(tag) {
            return CommandTag::Log(severity);
        }
        match mode {
            SessionMode::Playback if tag == self.frame_request_tag => CommandTag::FrameRequest,
            SessionMode::Record if tag == self.capture_tag => CommandTag::CaptureBlock,
            _ => CommandTag::Unknown(tag),
        }
    }

    /// Mode byte sent after the system tag.
    pub fn mode_byte(&self, mode: SessionMode) -> u8 {
        match mode {
            SessionMode::Playback => self.playback_mode,
            SessionMode::Record => self.record_mode,
        }
    }

    /// Number of ports marked connected.
    pub fn connected_ports(&self) -> usize {
        self.ports.iter().filter(|port| port.connected).count()
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::n64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_n64_playback_tags() {
        let profile = DeviceProfile::n64();
        let mode = SessionMode::Playback;

        assert_eq!(profile.classify(0xFC, mode), CommandTag::Log(Severity::Debug));
        assert_eq!(profile.classify(0xFF, mode), CommandTag::Log(Severity::Error));
        assert_eq!(profile.classify(0xD0, mode), CommandTag::FrameRequest);
        assert_eq!(profile.classify(0xB0, mode), CommandTag::Unknown(0xB0));
        assert_eq!(profile.classify(0x42, mode), CommandTag::Unknown(0x42));
    }

    #[test]
    fn classifies_n64_record_tags() {
        let profile = DeviceProfile::n64();
        let mode = SessionMode::Record;

        assert_eq!(profile.classify(0xFE, mode), CommandTag::Log(Severity::Warn));
        assert_eq!(profile.classify(0xB0, mode), CommandTag::CaptureBlock);
        assert_eq!(profile.classify(0xD0, mode), CommandTag::Unknown(0xD0));
    }

    #[test]
    fn mode_bytes() {
        let profile = DeviceProfile::n64();
        assert_eq!(profile.mode_byte(SessionMode::Playback), 0x03);
        assert_eq!(profile.mode_byte(SessionMode::Record), 0x01);
    }

    #[test]
    fn custom_revision_moves_tags() {
        let profile = DeviceProfile {
            frame_request_tag: 0x80,
            frame_response_tag: 0x80,
            controller_config_tag: 0x81,
            ..DeviceProfile::n64()
        };

        let mode = SessionMode::Playback;
        assert_eq!(profile.classify(0x80, mode), CommandTag::FrameRequest);
        assert_eq!(profile.classify(0xD0, mode), CommandTag::Unknown(0xD0));
    }

    #[test]
    fn default_profile_drives_one_port() {
        assert_eq!(DeviceProfile::default().connected_ports(), 1);
    }
}
