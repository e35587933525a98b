//! Command frame encoding.
//!
//! A command frame carries one 4-byte slice per channel. The high nibble of
//! the last byte of each slice selects the command; the rest of the slice is
//! laid out per command:
//!
//! | command        | b0        | b1         | b2     | b3                   |
//! |----------------|-----------|------------|--------|----------------------|
//! | LED set        | blue      | green      | red    | `0x40 \| pattern`    |
//! | audio set      | index lo  | index hi   | volume | `0x50 \| loop`       |
//! | audio info get | 0         | 0          | 0      | `0x60`               |
//! | generic        | 0         | 0          | 0      | `code << 4`          |
//!
//! Numeric fields wider than their slot are masked, never rejected.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::channel::{ChannelIndex, CHANNEL_COUNT, COMMAND_SLICE_SIZE};
use crate::color::Rgb;
use crate::error::{FrameError, Result};

/// Command frame size on the wire.
pub const COMMAND_SIZE: usize = CHANNEL_COUNT * COMMAND_SLICE_SIZE;

pub const CMD_LED_SET: u8 = 0x4;
pub const CMD_AUDIO_SET: u8 = 0x5;
pub const CMD_AUDIO_INFO_GET: u8 = 0x6;

const NIBBLE: u8 = 0x0F;

/// What to ask one channel's puck to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelCommandRequest {
    LedSet { color: Rgb, pattern: u8 },
    AudioSet { index: u16, volume: u8, looped: bool },
    AudioInfoGet,
    /// Raw command selector with zeroed parameters. Code 0 is a no-op.
    Generic { code: u8 },
}

impl Default for ChannelCommandRequest {
    fn default() -> Self {
        Self::Generic { code: 0 }
    }
}

impl ChannelCommandRequest {
    /// The 4-bit selector this request encodes to.
    pub fn code(&self) -> u8 {
        match self {
            Self::LedSet { .. } => CMD_LED_SET,
            Self::AudioSet { .. } => CMD_AUDIO_SET,
            Self::AudioInfoGet => CMD_AUDIO_INFO_GET,
            Self::Generic { code } => code & NIBBLE,
        }
    }

    pub fn encode_slice(&self) -> [u8; COMMAND_SLICE_SIZE] {
        let selector = self.code() << 4;
        match *self {
            Self::LedSet { color, pattern } => {
                [color.b, color.g, color.r, selector | (pattern & NIBBLE)]
            }
            Self::AudioSet {
                index,
                volume,
                looped,
            } => {
                let [lo, hi] = index.to_le_bytes();
                [lo, hi, volume, selector | u8::from(looped)]
            }
            Self::AudioInfoGet | Self::Generic { .. } => [0, 0, 0, selector],
        }
    }
}

/// Parses the CLI command syntax:
/// `led:<color>:<pattern>`, `audio:<index>:<volume>[:loop]`, `info`,
/// `generic:<code>`. Numbers are decimal or `0x` hex.
impl FromStr for ChannelCommandRequest {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FrameError::InvalidCommand(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();

        match parts.as_slice() {
            ["led", color, pattern] => Ok(Self::LedSet {
                color: Rgb::parse(color)?,
                pattern: parse_number(pattern).ok_or_else(invalid)?,
            }),
            ["audio", index, volume] | ["audio", index, volume, "loop"] => Ok(Self::AudioSet {
                index: parse_number(index).ok_or_else(invalid)?,
                volume: parse_number(volume).ok_or_else(invalid)?,
                looped: parts.len() == 4,
            }),
            ["info"] => Ok(Self::AudioInfoGet),
            ["generic", code] => Ok(Self::Generic {
                code: parse_number(code).ok_or_else(invalid)?,
            }),
            _ => Err(invalid()),
        }
    }
}

fn parse_number<T>(text: &str) -> Option<T>
where
    T: FromStr + TryFrom<u32>,
{
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16)
            .ok()
            .and_then(|v| T::try_from(v).ok()),
        None => text.parse().ok(),
    }
}

impl fmt::Display for ChannelCommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LedSet { color, pattern } => write!(f, "led:{color}:{pattern}"),
            Self::AudioSet {
                index,
                volume,
                looped,
            } => {
                write!(f, "audio:{index}:{volume}")?;
                if *looped {
                    f.write_str(":loop")?;
                }
                Ok(())
            }
            Self::AudioInfoGet => f.write_str("info"),
            Self::Generic { code } => write!(f, "generic:{code}"),
        }
    }
}

/// A complete 16-byte command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommandFrame([u8; COMMAND_SIZE]);

impl CommandFrame {
    pub fn as_bytes(&self) -> &[u8; COMMAND_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; COMMAND_SIZE] {
        self.0
    }

    /// The four bytes addressed to `channel`.
    pub fn slice(&self, channel: ChannelIndex) -> &[u8] {
        let offset = channel.command_offset();
        &self.0[offset..offset + COMMAND_SLICE_SIZE]
    }

    /// Command selector for `channel`, recovered from the high nibble.
    pub fn command_code(&self, channel: ChannelIndex) -> u8 {
        self.0[channel.command_offset() + COMMAND_SLICE_SIZE - 1] >> 4
    }
}

impl From<[u8; COMMAND_SIZE]> for CommandFrame {
    fn from(bytes: [u8; COMMAND_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Build a command frame from one request per channel, in channel order.
pub fn encode_command(requests: &[ChannelCommandRequest; CHANNEL_COUNT]) -> CommandFrame {
    let mut frame = [0u8; COMMAND_SIZE];
    for (channel, request) in ChannelIndex::ALL.iter().zip(requests) {
        let offset = channel.command_offset();
        frame[offset..offset + COMMAND_SLICE_SIZE].copy_from_slice(&request.encode_slice());
    }
    trace!(
        id1 = requests[0].code(),
        id2 = requests[1].code(),
        id3 = requests[2].code(),
        id4 = requests[3].code(),
        "encoded command frame"
    );
    CommandFrame(frame)
}
