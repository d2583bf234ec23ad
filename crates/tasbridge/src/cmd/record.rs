use tasbridge_session::{CancelToken, Console, N64Movie, SessionConfig, Status, StatusSink};

use crate::cmd::device::{
    finish_session, install_ctrlc_handler, open_device, parse_optional_timeout, save_movie,
};
use crate::cmd::journal::Journal;
use crate::cmd::RecordArgs;
use crate::exit::{session_error, CliResult};
use crate::output::{OutputFormat, StatusPrinter};

pub fn run(args: RecordArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_optional_timeout(args.timeout.as_deref())?;
    let meta = args.movie.metadata();
    let mut console = N64Movie::new(meta.game, meta.controllers, meta.author, meta.description)
        .map_err(|err| session_error("invalid movie", err))?
        .with_config(SessionConfig {
            lossy_log_text: args.lossy_log,
            ..SessionConfig::default()
        });

    let mut channel = open_device(&args.device, timeout)?;
    let journal = Journal::create(&args.output)?;
    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone(), Some(journal.clone()))?;

    let mut printer = StatusPrinter::new(format, args.progress_every);
    let mut sink = |status: &Status<'_>| {
        if status.sample.is_some() {
            journal.sync(status.movie);
        }
        printer.on_status(status);
    };
    let outcome = console.record(&mut channel, &cancel, Some(&mut sink));

    // Whatever was captured is kept, even when the session failed.
    journal.close();
    let movie = console.into_movie();
    save_movie(&args.output, &movie)?;

    finish_session(outcome, format, "recording failed")
}
