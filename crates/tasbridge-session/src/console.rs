//! Per-console session capabilities.
//!
//! Each supported console pairs a [`Movie`] with the device profile and
//! session settings needed to play or record it. Front ends work against
//! [`Console`] and never look at console-specific byte values.

use tasbridge_channel::ByteChannel;
use tasbridge_frame::DeviceProfile;
use tasbridge_movie::{Movie, MovieMetadata};

use crate::cancel::CancelToken;
use crate::config::SessionConfig;
use crate::error::{Outcome, Result};
use crate::playback::play;
use crate::record::record;
use crate::status::StatusSink;

/// A movie bound to the console it runs on.
pub trait Console {
    fn movie(&self) -> &Movie;

    /// Session settings, including the device profile.
    fn config(&self) -> &SessionConfig;

    /// Play the movie back through `channel`.
    fn play(
        &self,
        channel: &mut dyn ByteChannel,
        cancel: &CancelToken,
        sink: Option<&mut dyn StatusSink>,
    ) -> Outcome;

    /// Append the device's captured frames to the movie.
    fn record(
        &mut self,
        channel: &mut dyn ByteChannel,
        cancel: &CancelToken,
        sink: Option<&mut dyn StatusSink>,
    ) -> Outcome;

    /// Append one frame of raw input, `controllers * 4` bytes.
    fn write(&mut self, raw: &[u8]) -> Result<()>;

    /// Label/value pairs for the human-readable summary.
    fn describe(&self) -> Vec<(&'static str, &str)> {
        self.movie().metadata().describe()
    }
}

/// Nintendo 64 movie.
#[derive(Debug, Clone)]
pub struct N64Movie {
    movie: Movie,
    config: SessionConfig,
}

impl N64Movie {
    /// Create an empty movie for `controllers` controllers.
    pub fn new(
        game: impl Into<String>,
        controllers: usize,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let config = SessionConfig {
            profile: DeviceProfile::n64(),
            ..SessionConfig::default()
        };
        let movie = Movie::new(MovieMetadata {
            system: config.profile.system_name.clone(),
            game: game.into(),
            controllers,
            author: author.into(),
            description: description.into(),
        })?;
        Ok(Self { movie, config })
    }

    /// Wrap an existing movie, e.g. one loaded from a raw dump.
    pub fn from_movie(movie: Movie) -> Self {
        Self {
            movie,
            config: SessionConfig::default(),
        }
    }

    /// Replace the session settings.
    ///
    /// The profile may describe a different firmware revision; it must still
    /// speak the N64 datastream protocol.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn into_movie(self) -> Movie {
        self.movie
    }
}

impl Console for N64Movie {
    fn movie(&self) -> &Movie {
        &self.movie
    }

    fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn play(
        &self,
        channel: &mut dyn ByteChannel,
        cancel: &CancelToken,
        sink: Option<&mut dyn StatusSink>,
    ) -> Outcome {
        play(channel, &self.movie, &self.config, cancel, sink)
    }

    fn record(
        &mut self,
        channel: &mut dyn ByteChannel,
        cancel: &CancelToken,
        sink: Option<&mut dyn StatusSink>,
    ) -> Outcome {
        record(channel, &mut self.movie, &self.config, cancel, sink)
    }

    fn write(&mut self, raw: &[u8]) -> Result<()> {
        Ok(self.movie.write(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use tasbridge_movie::MovieError;

    use super::*;
    use crate::error::SessionError;
    use crate::status::SessionState;
    use crate::testing::{device, device_interrupted_at_eof, written};

    #[test]
    fn new_movie_is_an_n64_movie() {
        let console = N64Movie::new("SUPER MARIO 64", 1, "rs", "").unwrap();

        assert_eq!(
            console.describe(),
            vec![
                ("System:", "Nintendo 64"),
                ("ROM:", "SUPER MARIO 64"),
                ("Author:", "rs"),
            ]
        );
        assert_eq!(console.movie().frames(), 0);
    }

    #[test]
    fn zero_controllers_is_rejected() {
        let err = N64Movie::new("", 0, "", "").unwrap_err();
        assert!(matches!(err, SessionError::Movie(MovieError::NoControllers)));
    }

    #[test]
    fn write_then_play_through_trait_object() {
        let mut n64 = N64Movie::new("TEST", 1, "", "").unwrap();
        n64.write(&[1, 2, 3, 4]).unwrap();
        assert!(n64.write(&[1, 2]).is_err());

        let console: &dyn Console = &n64;
        let cancel = CancelToken::new();
        let mut channel = device_interrupted_at_eof(&[0xD0, 0x04], &cancel);
        let report = console.play(&mut channel, &cancel, None).unwrap();

        assert_eq!(report.frame, 1);
        assert!(written(&channel).ends_with(&[0xD0, 0x04, 1, 2, 3, 4]));
    }

    #[test]
    fn record_through_trait_object() {
        let mut n64 = N64Movie::new("TEST", 1, "", "").unwrap();
        let cancel = CancelToken::new();
        let mut channel =
            device_interrupted_at_eof(&[0xB0, 0x00, 0x05, 0x01, 0x01, 9, 9, 9, 9], &cancel);

        let console: &mut dyn Console = &mut n64;
        let report = console.record(&mut channel, &cancel, None).unwrap();

        assert_eq!(report.state, SessionState::Interrupted);
        assert_eq!(n64.into_movie().frames(), 1);
    }

    #[test]
    fn custom_profile_changes_init_bytes() {
        let mut config = SessionConfig::default();
        config.profile.playback_mode = 0x02;
        let n64 = N64Movie::new("TEST", 1, "", "")
            .unwrap()
            .with_config(config);

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut channel = device(&[]);
        n64.play(&mut channel, &cancel, None).unwrap();

        assert_eq!(&written(&channel)[..5], &[0x80, b'N', b'6', b'4', 0x02]);
    }
}
