use std::path::PathBuf;

/// Errors that can occur on the notify/write transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind the bridge socket to the specified path.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to deliver a command datagram to the bridge.
    #[error("failed to send to {path}: {source}")]
    Send {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// A received datagram did not fit the receive buffer.
    #[error("datagram exceeds {max} bytes")]
    DatagramTooLarge { max: usize },

    /// A command write was attempted without a destination.
    #[error("no bridge peer configured for command writes")]
    NoPeer,

    /// The remote side went away.
    #[error("transport disconnected")]
    Disconnected,

    /// The board code could not be turned into a scan filter.
    #[error("invalid board code: {0}")]
    InvalidBoardCode(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
