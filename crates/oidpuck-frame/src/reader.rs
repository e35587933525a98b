use oidpuck_transport::{NotifySource, TransportError};
use tracing::warn;

use crate::decoder::decode_notification;
use crate::error::{FrameError, Result};
use crate::report::Notification;
use crate::session::Session;

/// Reader behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Forget all latches when the source reports a disconnect.
    pub reset_on_disconnect: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            reset_on_disconnect: true,
        }
    }
}

/// Reads and decodes notifications from any [`NotifySource`].
///
/// The reader owns the [`Session`] for its source. A wrong-length
/// notification, empty ones included, surfaces as
/// [`FrameError::InvalidLength`] and leaves the session as it was. A datagram
/// too large for the transport buffer is rejected the same way (see
/// [`FrameError::is_rejected_frame`]), so callers can log it and keep reading.
pub struct NotificationReader<S> {
    source: S,
    session: Session,
    config: ReaderConfig,
}

impl<S: NotifySource> NotificationReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        Self {
            source,
            session: Session::new(),
            config,
        }
    }

    /// Block for the next notification and decode it.
    pub fn read_notification(&mut self) -> Result<Notification> {
        let bytes = match self.source.recv_notification() {
            Ok(bytes) => bytes,
            Err(TransportError::Disconnected) => {
                if self.config.reset_on_disconnect {
                    self.session.reset();
                }
                return Err(FrameError::Transport(TransportError::Disconnected));
            }
            Err(err @ TransportError::DatagramTooLarge { .. }) => {
                warn!(error = %err, "rejected notification");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        match decode_notification(&bytes, &mut self.session) {
            Ok(reports) => Ok(Notification {
                sequence: self.session.frame_counter(),
                reports,
            }),
            Err(err) => {
                warn!(len = bytes.len(), error = %err, "rejected notification");
                Err(err)
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start over as if the source had just connected.
    pub fn reset_session(&mut self) {
        self.session.reset();
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

impl<S: NotifySource> Iterator for NotificationReader<S> {
    type Item = Result<Notification>;

    /// Yields until the source disconnects.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_notification() {
            Err(FrameError::Transport(TransportError::Disconnected)) => None,
            other => Some(other),
        }
    }
}
