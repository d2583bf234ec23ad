mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tasbridge", version, about = "TAS replay device CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    /// Minimum level for log lines sent by the device (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "debug", global = true)]
    device_log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level, cli.device_log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::OnExhausted;

    #[test]
    fn parses_play_subcommand() {
        let cli = Cli::try_parse_from([
            "tasbridge",
            "play",
            "/dev/ttyACM0",
            "run.raw",
            "--controllers",
            "2",
            "--on-exhausted",
            "repeat-last",
        ])
        .expect("play args should parse");

        match cli.command {
            Command::Play(args) => {
                assert_eq!(args.device, "/dev/ttyACM0");
                assert_eq!(args.movie.controllers, 2);
                assert!(matches!(args.on_exhausted, OnExhausted::RepeatLast));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_record_subcommand() {
        let cli = Cli::try_parse_from([
            "tasbridge",
            "record",
            "tcp://127.0.0.1:2000",
            "--output",
            "out.raw",
            "--game",
            "SUPER MARIO 64",
        ])
        .expect("record args should parse");

        assert!(matches!(cli.command, Command::Record(_)));
    }

    #[test]
    fn rejects_too_many_controllers() {
        let err = Cli::try_parse_from([
            "tasbridge",
            "info",
            "run.raw",
            "--controllers",
            "5",
        ])
        .expect_err("five controllers should be rejected");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn device_log_level_is_global() {
        let cli = Cli::try_parse_from([
            "tasbridge",
            "probe",
            "/dev/ttyACM0",
            "--device-log-level",
            "warn",
        ])
        .expect("global flag after subcommand should parse");

        assert!(matches!(cli.device_log_level, LogLevel::Warn));
        assert!(matches!(cli.log_level, LogLevel::Info));
    }

    #[test]
    fn record_requires_output() {
        let err = Cli::try_parse_from(["tasbridge", "record", "/dev/ttyACM0"])
            .expect_err("missing --output should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
