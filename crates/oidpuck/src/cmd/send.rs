use oidpuck_frame::CommandWriter;
use oidpuck_transport::BridgeSocket;
use tracing::info;

use crate::cmd::SendArgs;
use crate::exit::{frame_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_command, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let requests = args.commands.requests()?;

    let socket = BridgeSocket::bind(&args.path)
        .map_err(|err| transport_error("bind failed", err))?
        .with_peer(&args.peer);
    let mut writer = CommandWriter::new(socket);

    let frame = writer
        .send(&requests)
        .map_err(|err| frame_error("send failed", err))?;
    info!(peer = %args.peer.display(), "command frame written");

    print_command(&requests, &frame, format);
    Ok(SUCCESS)
}
