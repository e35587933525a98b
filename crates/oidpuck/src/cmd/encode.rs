use oidpuck_frame::encode_command;

use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_command, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let requests = args.commands.requests()?;
    let frame = encode_command(&requests);
    print_command(&requests, &frame, format);
    Ok(SUCCESS)
}
