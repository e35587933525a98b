use tracing::debug;

use crate::channel::{ChannelIndex, CHANNEL_COUNT};
use crate::latch::ChannelLatch;

/// Decode state for one connection to a hub.
///
/// Create one when the transport connects and drop or [`reset`](Self::reset)
/// it when the transport goes away. Latches live exactly as long as the
/// session; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    latches: [ChannelLatch; CHANNEL_COUNT],
    frame_counter: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&self, channel: ChannelIndex) -> &ChannelLatch {
        &self.latches[channel.slot()]
    }

    pub(crate) fn latch_mut(&mut self, channel: ChannelIndex) -> &mut ChannelLatch {
        &mut self.latches[channel.slot()]
    }

    /// Number of notifications decoded so far (wraps at `u32::MAX`).
    ///
    /// Display sequence only; the protocol itself has no sequence numbers.
    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub(crate) fn advance(&mut self) -> u32 {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.frame_counter
    }

    /// Forget every latch and restart the counter.
    pub fn reset(&mut self) {
        debug!(frames = self.frame_counter, "resetting session");
        *self = Self::default();
    }
}
