use tasbridge_session::{CancelToken, Console, N64Movie, SessionConfig};
use tracing::info;

use crate::cmd::device::{
    finish_session, install_ctrlc_handler, load_movie, open_device, parse_optional_timeout,
};
use crate::cmd::PlayArgs;
use crate::exit::CliResult;
use crate::output::{OutputFormat, StatusPrinter};

pub fn run(args: PlayArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_optional_timeout(args.timeout.as_deref())?;
    let movie = load_movie(&args.inputs, args.movie.metadata())?;
    info!(
        inputs = %args.inputs.display(),
        frames = movie.frames(),
        controllers = movie.controllers(),
        "movie loaded"
    );

    let console = N64Movie::from_movie(movie).with_config(SessionConfig {
        exhaustion: args.on_exhausted.into(),
        lossy_log_text: args.lossy_log,
        ..SessionConfig::default()
    });

    let mut channel = open_device(&args.device, timeout)?;
    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone(), None)?;

    let mut printer = StatusPrinter::new(format, args.progress_every);
    let outcome = console.play(&mut channel, &cancel, Some(&mut printer));
    finish_session(outcome, format, "playback failed")
}
