//! Frame codec for four-channel OID puck hubs.
//!
//! Every inbound notification is 20 bytes: four 5-byte channel slices, each
//! ending in a status byte whose low three bits select how the four data
//! bytes are read. Every outbound command is 16 bytes: four 4-byte channel
//! slices, each ending in a byte whose high nibble is the command code.
//!
//! Product identifiers and checksums arrive in their own reports and are
//! latched per channel in a [`Session`], so later status reports can be
//! combined with them.

pub mod channel;
pub mod color;
pub mod command;
pub mod decoder;
pub mod error;
pub mod latch;
pub mod reader;
pub mod report;
pub mod session;
pub mod status;
pub mod writer;

#[cfg(feature = "async")]
pub mod tokio_codec;

pub use channel::{ChannelIndex, CHANNEL_COUNT, COMMAND_SLICE_SIZE, NOTIFY_SLICE_SIZE};
pub use color::Rgb;
pub use command::{
    encode_command, ChannelCommandRequest, CommandFrame, CMD_AUDIO_INFO_GET, CMD_AUDIO_SET,
    CMD_LED_SET, COMMAND_SIZE,
};
pub use decoder::{decode_notification, decode_slice, NOTIFICATION_SIZE};
pub use error::{FrameError, Result};
pub use latch::ChannelLatch;
pub use reader::{NotificationReader, ReaderConfig};
pub use report::{
    battery_voltage, ChannelReport, LatchKind, Notification, NspStatus, PositionReport,
    ReportPayload, StatusDataReport,
};
pub use session::Session;
pub use status::{ButtonGesture, ChargeState, PuckState, ReportType};
pub use writer::CommandWriter;

#[cfg(feature = "async")]
pub use tokio_codec::PuckCodec;
