use bytes::Bytes;

use crate::error::Result;

/// Source of inbound notifications from the TX characteristic.
///
/// Each call yields exactly one notification with its original length.
/// Implementations must not pad, truncate or coalesce notifications: a
/// wrong-sized notification has to reach the decoder as-is so it can be
/// rejected there.
pub trait NotifySource {
    /// Block until the next notification arrives.
    fn recv_notification(&mut self) -> Result<Bytes>;
}

/// Sink for outbound command frames on the RX characteristic.
///
/// A successful return means the write completed. Callers keep at most one
/// command in flight; the protocol has no acknowledgement correlation.
pub trait CommandSink {
    /// Write one command frame.
    fn write_command(&mut self, frame: &[u8]) -> Result<()>;
}

impl<T: NotifySource + ?Sized> NotifySource for &mut T {
    fn recv_notification(&mut self) -> Result<Bytes> {
        (**self).recv_notification()
    }
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    fn write_command(&mut self, frame: &[u8]) -> Result<()> {
        (**self).write_command(frame)
    }
}

impl<T: NotifySource + ?Sized> NotifySource for Box<T> {
    fn recv_notification(&mut self) -> Result<Bytes> {
        (**self).recv_notification()
    }
}

impl<T: CommandSink + ?Sized> CommandSink for Box<T> {
    fn write_command(&mut self, frame: &[u8]) -> Result<()> {
        (**self).write_command(frame)
    }
}

/// Captured command frames are kept in order, one entry per write.
impl CommandSink for Vec<Vec<u8>> {
    fn write_command(&mut self, frame: &[u8]) -> Result<()> {
        self.push(frame.to_vec());
        Ok(())
    }
}
