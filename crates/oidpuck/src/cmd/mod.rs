use clap::{Args, Subcommand};
use std::path::PathBuf;

use oidpuck_frame::{ChannelCommandRequest, CHANNEL_COUNT};

use crate::exit::{frame_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod filter;
pub mod monitor;
pub mod send;
pub mod uuids;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode hex-encoded notifications through one session.
    Decode(DecodeArgs),
    /// Build a command frame and print it.
    Encode(EncodeArgs),
    /// Bind a bridge socket and decode notifications as they arrive.
    Monitor(MonitorArgs),
    /// Encode a command frame and write it to a bridge.
    Send(SendArgs),
    /// List known GATT UUIDs or look one up.
    Uuids(UuidsArgs),
    /// Print the advertisement filter for a board code.
    Filter(FilterArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Uuids(args) => uuids::run(args, format),
        Command::Filter(args) => filter::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Notifications as hex strings (spaces, colons and a 0x prefix are ignored).
    #[arg(value_name = "HEX", required_unless_present = "file")]
    pub frames: Vec<String>,
    /// Read notifications from a file, one hex string per line.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ChannelCommands {
    /// Command for channel 1: led:<color>:<pattern>, audio:<index>:<volume>[:loop], info, generic:<code>.
    #[arg(long, value_name = "SPEC", default_value = "generic:0")]
    pub ch1: String,
    /// Command for channel 2.
    #[arg(long, value_name = "SPEC", default_value = "generic:0")]
    pub ch2: String,
    /// Command for channel 3.
    #[arg(long, value_name = "SPEC", default_value = "generic:0")]
    pub ch3: String,
    /// Command for channel 4.
    #[arg(long, value_name = "SPEC", default_value = "generic:0")]
    pub ch4: String,
}

impl ChannelCommands {
    pub fn requests(&self) -> CliResult<[ChannelCommandRequest; CHANNEL_COUNT]> {
        let parse = |flag: &str, spec: &str| {
            spec.parse::<ChannelCommandRequest>()
                .map_err(|err| frame_error(&format!("--{flag}"), err))
        };
        Ok([
            parse("ch1", &self.ch1)?,
            parse("ch2", &self.ch2)?,
            parse("ch3", &self.ch3)?,
            parse("ch4", &self.ch4)?,
        ])
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub commands: ChannelCommands,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Socket path to bind; the bridge sends notifications here.
    pub path: PathBuf,
    /// Exit after decoding N notifications.
    #[arg(long)]
    pub count: Option<usize>,
    /// Give up if no notification arrives for this long (e.g. 5s, 500ms).
    #[arg(long)]
    pub timeout: Option<String>,
    /// Treat an empty datagram as the bridge's link-down marker and reset
    /// all latches. Without it an empty datagram is a rejected frame.
    #[arg(long)]
    pub disconnect_marker: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Local socket path to bind for the exchange.
    pub path: PathBuf,
    /// Bridge socket path that receives command frames.
    #[arg(long, env = "OIDPUCK_BRIDGE")]
    pub peer: PathBuf,
    #[command(flatten)]
    pub commands: ChannelCommands,
}

#[derive(Args, Debug)]
pub struct UuidsArgs {
    /// UUID to look up. Omit to list the whole catalogue.
    pub uuid: Option<String>,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Six hex digit board code printed on the hub.
    #[arg(env = "OIDPUCK_PERIPHERAL")]
    pub code: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
