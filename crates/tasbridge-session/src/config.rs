use tasbridge_frame::DeviceProfile;

/// What playback sends once the movie has no samples left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// End the session with `SessionError::InputExhausted`.
    #[default]
    Fail,
    /// Keep sending the movie's last sample.
    RepeatLast,
    /// Send zeroed samples.
    Neutral,
}

/// Configuration for playback and recording sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Byte values for the attached device.
    pub profile: DeviceProfile,
    /// End-of-movie behaviour during playback.
    pub exhaustion: ExhaustionPolicy,
    /// Replace invalid UTF-8 in device log lines instead of failing.
    pub lossy_log_text: bool,
}
