use oidpuck_transport::TransportError;

/// Errors that can occur while decoding notifications or building commands.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A notification did not have the fixed wire length.
    #[error("invalid notification length ({actual} bytes, expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    /// A color string was not six hex digits with an optional `#`.
    #[error("invalid color {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    /// A channel index outside 1..=4.
    #[error("channel index {0} out of range (1..=4)")]
    InvalidChannel(u8),

    /// A textual command specification could not be parsed.
    #[error("invalid command spec: {0}")]
    InvalidCommand(String),

    /// The notify or write path failed. Never retried here.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// An I/O error from a byte-stream adapter.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// A single notification of the wrong size was dropped; the session is
    /// untouched and the caller can keep reading.
    ///
    /// Covers both a short or long frame that reached the decoder and a
    /// datagram the transport refused for exceeding its receive buffer.
    pub fn is_rejected_frame(&self) -> bool {
        matches!(
            self,
            FrameError::InvalidLength { .. }
                | FrameError::Transport(TransportError::DatagramTooLarge { .. })
        )
    }

    /// Byte count of a rejected frame, when the transport could measure it.
    pub fn rejected_length(&self) -> Option<usize> {
        match self {
            FrameError::InvalidLength { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
