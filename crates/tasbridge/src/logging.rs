use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, prelude::*};

/// Target the session engine re-emits device log lines under.
pub const DEVICE_TARGET: &str = "device";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn filter(level: LogLevel, device_level: LogLevel) -> Targets {
    Targets::new()
        .with_target(DEVICE_TARGET, device_level.as_filter())
        .with_default(level.as_filter())
}

/// Install the stderr subscriber.
///
/// Device log lines arrive with target `device` and are filtered by
/// `device_level`, independently of host diagnostics. JSON output keeps the
/// target so the two can be told apart.
pub fn init_logging(format: LogFormat, level: LogLevel, device_level: LogLevel) {
    let registry = tracing_subscriber::registry().with(filter(level, device_level));

    match format {
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false);
            let _ = registry.with(layer).try_init();
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true);
            let _ = registry.with(layer).try_init();
        }
    }
}
