use crate::cmd::device::load_movie;
use crate::cmd::InfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_movie, OutputFormat};

pub fn run(args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let movie = load_movie(&args.inputs, args.movie.metadata())?;
    print_movie(&movie, format);
    Ok(SUCCESS)
}
