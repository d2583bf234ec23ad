use tasbridge_frame::DeviceProfile;
use tasbridge_session::probe;

use crate::cmd::device::{open_device, parse_timeout};
use crate::cmd::ProbeArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_device, OutputFormat};

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_timeout(&args.timeout)?;
    let mut channel = open_device(&args.device, Some(timeout))?;

    let info = probe(&mut channel, &DeviceProfile::n64())
        .map_err(|err| session_error("probe failed", err))?;

    print_device(&args.device, &info, format);
    Ok(SUCCESS)
}
