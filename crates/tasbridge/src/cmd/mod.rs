use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use tasbridge_frame::{DeviceProfile, PORT_COUNT};
use tasbridge_movie::MovieMetadata;
use tasbridge_session::ExhaustionPolicy;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod device;
pub mod info;
pub mod journal;
pub mod play;
pub mod probe;
pub mod record;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a raw input dump back through the device.
    Play(PlayArgs),
    /// Record controller input from the console into a raw dump.
    Record(RecordArgs),
    /// Print the summary of a raw input dump.
    Info(InfoArgs),
    /// Ask an idle device for its description and firmware version.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Play(args) => play::run(args, format),
        Command::Record(args) => record::run(args, format),
        Command::Info(args) => info::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// What to send once the movie runs out.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OnExhausted {
    /// Stop with an error.
    #[default]
    Fail,
    /// Keep sending the last frame.
    RepeatLast,
    /// Send released buttons and centered stick.
    Neutral,
}

impl From<OnExhausted> for ExhaustionPolicy {
    fn from(value: OnExhausted) -> Self {
        match value {
            OnExhausted::Fail => ExhaustionPolicy::Fail,
            OnExhausted::RepeatLast => ExhaustionPolicy::RepeatLast,
            OnExhausted::Neutral => ExhaustionPolicy::Neutral,
        }
    }
}

/// Movie metadata flags. Raw dumps carry no header.
#[derive(Args, Debug)]
pub struct MovieArgs {
    /// Controllers per frame in the dump.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=PORT_COUNT as i64)
    )]
    pub controllers: u8,
    /// Game (ROM) name.
    #[arg(long, default_value = "")]
    pub game: String,
    /// Movie author.
    #[arg(long, default_value = "")]
    pub author: String,
    /// Free-form description.
    #[arg(long, default_value = "")]
    pub description: String,
}

impl MovieArgs {
    pub fn metadata(&self) -> MovieMetadata {
        MovieMetadata {
            system: DeviceProfile::n64().system_name,
            game: self.game.clone(),
            controllers: usize::from(self.controllers),
            author: self.author.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Device path or tcp://host:port serial bridge.
    #[arg(env = "TASBRIDGE_DEVICE")]
    pub device: String,
    /// Raw input dump to play.
    pub inputs: PathBuf,
    #[command(flatten)]
    pub movie: MovieArgs,
    /// Behaviour once the dump runs out.
    #[arg(long, value_enum, default_value_t = OnExhausted::Fail)]
    pub on_exhausted: OnExhausted,
    /// Device read/write timeout (e.g. 5s, 500ms). Default: wait forever.
    #[arg(long, env = "TASBRIDGE_TIMEOUT")]
    pub timeout: Option<String>,
    /// Replace invalid UTF-8 in device log lines instead of failing.
    #[arg(long)]
    pub lossy_log: bool,
    /// Print frame progress every N frames.
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub progress_every: usize,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Device path or tcp://host:port serial bridge.
    #[arg(env = "TASBRIDGE_DEVICE")]
    pub device: String,
    /// Raw dump to write. Written on exit, including after Ctrl-C.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
    #[command(flatten)]
    pub movie: MovieArgs,
    /// Device read/write timeout (e.g. 5s, 500ms). Default: wait forever.
    #[arg(long, env = "TASBRIDGE_TIMEOUT")]
    pub timeout: Option<String>,
    /// Replace invalid UTF-8 in device log lines instead of failing.
    #[arg(long)]
    pub lossy_log: bool,
    /// Print frame progress every N frames.
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub progress_every: usize,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Raw input dump.
    pub inputs: PathBuf,
    #[command(flatten)]
    pub movie: MovieArgs,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Device path or tcp://host:port serial bridge.
    #[arg(env = "TASBRIDGE_DEVICE")]
    pub device: String,
    /// Reply timeout (e.g. 5s, 500ms).
    #[arg(long, env = "TASBRIDGE_TIMEOUT", default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
