//! Helpers shared by the device-facing subcommands.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use tasbridge_channel::{ChannelConfig, DeviceStream, StreamChannel};
use tasbridge_movie::{Movie, MovieMetadata};
use tasbridge_session::{CancelToken, Outcome};
use tracing::{info, warn};

use crate::cmd::journal::Journal;
use crate::exit::{
    channel_error, io_error, movie_error, session_error, CliError, CliResult, INTERNAL,
    INTERRUPTED, SUCCESS, USAGE,
};
use crate::output::{print_report, OutputFormat};

pub fn open_device(
    target: &str,
    timeout: Option<Duration>,
) -> CliResult<StreamChannel<DeviceStream>> {
    let config = ChannelConfig {
        read_timeout: timeout,
        write_timeout: timeout,
        ..ChannelConfig::default()
    };
    let channel =
        tasbridge_channel::open(target, config).map_err(|err| channel_error("open failed", err))?;
    info!(
        device = target,
        tcp = channel.get_ref().is_tcp(),
        ?timeout,
        "device opened"
    );
    Ok(channel)
}

/// Trip `cancel` on the first Ctrl-C and exit on the second.
///
/// Sessions only look at the token between commands. A second Ctrl-C gets
/// out of a read the device never answers; `journal`, when given, is
/// flushed first so frames captured so far stay on disk.
pub fn install_ctrlc_handler(cancel: CancelToken, journal: Option<Journal>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            if let Some(journal) = &journal {
                journal.flush();
                warn!(frames = journal.frames(), "forced exit, recorded frames kept");
            }
            std::process::exit(INTERRUPTED);
        }
        warn!("stop requested, finishing current command");
        cancel.cancel();
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

/// Print the session report and turn a failure into the matching exit code.
pub fn finish_session(outcome: Outcome, format: OutputFormat, context: &str) -> CliResult<i32> {
    match outcome {
        Ok(report) => {
            print_report(&report, format);
            Ok(SUCCESS)
        }
        Err(failure) => {
            print_report(&failure.report, format);
            Err(session_error(context, failure.error))
        }
    }
}

pub fn load_movie(path: &Path, metadata: MovieMetadata) -> CliResult<Movie> {
    let file = File::open(path)
        .map_err(|err| io_error(&format!("cannot open {}", path.display()), err))?;
    let mut reader = BufReader::new(file);
    Movie::import_raw(metadata, &mut reader)
        .map_err(|err| movie_error(&format!("cannot load {}", path.display()), err))
}

pub fn save_movie(path: &Path, movie: &Movie) -> CliResult<()> {
    let file = File::create(path)
        .map_err(|err| io_error(&format!("cannot create {}", path.display()), err))?;
    let mut writer = BufWriter::new(file);
    movie
        .export_raw(&mut writer)
        .map_err(|err| movie_error(&format!("cannot write {}", path.display()), err))?;
    info!(path = %path.display(), frames = movie.frames(), "movie saved");
    Ok(())
}

/// Parse `--timeout`: `500ms`, `5s` or bare seconds.
pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    let (digits, unit): (&str, fn(u64) -> Duration) = match input.strip_suffix("ms") {
        Some(millis) => (millis, Duration::from_millis),
        None => (input.strip_suffix('s').unwrap_or(input), Duration::from_secs),
    };

    match digits.trim_end().parse::<u64>() {
        Ok(0) => Err(CliError::new(USAGE, "timeout must be greater than zero")),
        Ok(value) => Ok(unit(value)),
        Err(_) => Err(CliError::new(
            USAGE,
            format!("invalid timeout {input:?}, expected e.g. 5s or 500ms"),
        )),
    }
}

pub fn parse_optional_timeout(input: Option<&str>) -> CliResult<Option<Duration>> {
    input.map(parse_timeout).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timeout_seconds() {
        assert_eq!(parse_timeout("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_timeout("2").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn parse_timeout_millis() {
        assert_eq!(parse_timeout("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_timeout(" 20 ms").unwrap(), Duration::from_millis(20));
    }

    #[test]
    fn parse_timeout_rejects_zero_and_garbage() {
        assert_eq!(parse_timeout("0s").unwrap_err().code, USAGE);
        assert_eq!(parse_timeout("soon").unwrap_err().code, USAGE);
        assert_eq!(parse_timeout("  ").unwrap_err().code, USAGE);
        assert_eq!(parse_timeout("ms").unwrap_err().code, USAGE);
        assert_eq!(parse_timeout("5m").unwrap_err().code, USAGE);
    }

    #[test]
    fn absent_timeout_waits_forever() {
        assert_eq!(parse_optional_timeout(None).unwrap(), None);
        assert_eq!(
            parse_optional_timeout(Some("1s")).unwrap(),
            Some(Duration::from_secs(1))
        );
    }
}
