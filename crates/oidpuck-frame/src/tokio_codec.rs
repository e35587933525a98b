//! `tokio_util::codec` adapter for byte-stream bridges.
//!
//! On a stream transport notification boundaries are implied by the fixed
//! 20-byte size. Nothing here limits commands in flight; callers that
//! share a stream between tasks must serialize writes themselves.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::channel::CHANNEL_COUNT;
use crate::command::{encode_command, ChannelCommandRequest, CommandFrame, COMMAND_SIZE};
use crate::decoder::{decode_notification, NOTIFICATION_SIZE};
use crate::error::{FrameError, Result};
use crate::report::Notification;
use crate::session::Session;

#[derive(Debug, Default)]
pub struct PuckCodec {
    session: Session,
}

impl PuckCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reset_session(&mut self) {
        self.session.reset();
    }
}

impl Decoder for PuckCodec {
    type Item = Notification;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < NOTIFICATION_SIZE {
            src.reserve(NOTIFICATION_SIZE - src.len());
            return Ok(None);
        }

        let chunk = src.split_to(NOTIFICATION_SIZE);
        let reports = decode_notification(&chunk, &mut self.session)?;
        Ok(Some(Notification {
            sequence: self.session.frame_counter(),
            reports,
        }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        match self.decode(src)? {
            Some(notification) => Ok(Some(notification)),
            None if src.is_empty() => Ok(None),
            None => {
                let actual = src.remaining();
                src.clear();
                Err(FrameError::InvalidLength {
                    expected: NOTIFICATION_SIZE,
                    actual,
                })
            }
        }
    }
}

impl Encoder<[ChannelCommandRequest; CHANNEL_COUNT]> for PuckCodec {
    type Error = FrameError;

    fn encode(
        &mut self,
        requests: [ChannelCommandRequest; CHANNEL_COUNT],
        dst: &mut BytesMut,
    ) -> Result<()> {
        Encoder::<CommandFrame>::encode(self, encode_command(&requests), dst)
    }
}

impl Encoder<CommandFrame> for PuckCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: CommandFrame, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(COMMAND_SIZE);
        dst.put_slice(frame.as_ref());
        Ok(())
    }
}
