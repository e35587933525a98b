use oidpuck_transport::CommandSink;
use tracing::debug;

use crate::channel::CHANNEL_COUNT;
use crate::command::{encode_command, ChannelCommandRequest, CommandFrame};
use crate::error::Result;

/// Encodes and writes command frames to any [`CommandSink`].
///
/// Each call returns only after the sink reports the outcome of the write,
/// so a single writer never has more than one command in flight.
pub struct CommandWriter<K> {
    sink: K,
    written: u64,
}

impl<K: CommandSink> CommandWriter<K> {
    pub fn new(sink: K) -> Self {
        Self { sink, written: 0 }
    }

    /// Encode one request per channel and write the frame.
    pub fn send(
        &mut self,
        requests: &[ChannelCommandRequest; CHANNEL_COUNT],
    ) -> Result<CommandFrame> {
        let frame = encode_command(requests);
        self.write_frame(&frame)?;
        Ok(frame)
    }

    /// Write an already encoded frame.
    pub fn write_frame(&mut self, frame: &CommandFrame) -> Result<()> {
        self.sink.write_command(frame.as_ref())?;
        self.written += 1;
        debug!(written = self.written, frame = ?frame.as_bytes(), "wrote command frame");
        Ok(())
    }

    /// Frames successfully written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn get_ref(&self) -> &K {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn into_inner(self) -> K {
        self.sink
    }
}
