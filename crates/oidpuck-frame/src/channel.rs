//! Channel indices and their fixed byte offsets.
//!
//! A hub serves four pucks. Channel `n` (1-based) owns bytes
//! `(n-1)*5 .. (n-1)*5+5` of a notification and `(n-1)*4 .. (n-1)*4+4` of a
//! command frame.

use std::fmt;

use crate::error::{FrameError, Result};

/// Number of channels multiplexed into every frame.
pub const CHANNEL_COUNT: usize = 4;

/// Bytes per channel in a notification (4 data + 1 status).
pub const NOTIFY_SLICE_SIZE: usize = 5;

/// Bytes per channel in a command frame.
pub const COMMAND_SLICE_SIZE: usize = 4;

/// A channel number in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelIndex(u8);

impl ChannelIndex {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);

    /// All channels in wire order.
    pub const ALL: [Self; CHANNEL_COUNT] = [Self::ONE, Self::TWO, Self::THREE, Self::FOUR];

    /// Checked constructor.
    pub fn new(index: u8) -> Result<Self> {
        if (1..=CHANNEL_COUNT as u8).contains(&index) {
            Ok(Self(index))
        } else {
            Err(FrameError::InvalidChannel(index))
        }
    }

    /// The 1-based channel number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, usable as an array index.
    pub const fn slot(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Offset of this channel's slice in a notification.
    pub const fn notify_offset(self) -> usize {
        self.slot() * NOTIFY_SLICE_SIZE
    }

    /// Offset of this channel's slice in a command frame.
    pub const fn command_offset(self) -> usize {
        self.slot() * COMMAND_SLICE_SIZE
    }
}

impl TryFrom<u8> for ChannelIndex {
    type Error = FrameError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl fmt::Display for ChannelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID{}", self.0)
    }
}
