use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};
use crate::traits::{CommandSink, NotifySource};

/// Default receive buffer, far above any puck notification.
pub const DEFAULT_MAX_DATAGRAM: usize = 512;

/// Runtime knobs for a [`BridgeSocket`].
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Read timeout for `recv_notification`. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Write timeout for `write_command`.
    pub write_timeout: Option<Duration>,
    /// Largest datagram accepted; anything bigger is an error.
    pub max_datagram_size: usize,
    /// Treat a zero-length datagram as the bridge's link-down marker and
    /// report [`TransportError::Disconnected`]. Off by default, in which
    /// case an empty datagram is handed up like any other notification.
    pub empty_datagram_is_disconnect: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            read_timeout: None,
            write_timeout: None,
            max_datagram_size: DEFAULT_MAX_DATAGRAM,
            empty_datagram_is_disconnect: false,
        }
    }
}

/// Unix datagram endpoint that relays the hub's notify/write pair.
///
/// A bridge process owns the BLE link and forwards every TX notification as
/// one datagram to the bound path, and every datagram it receives as one RX
/// write. Datagrams keep message boundaries, so a short or long notification
/// arrives with its real length.
pub struct BridgeSocket {
    socket: UnixDatagram,
    local_path: Option<PathBuf>,
    peer: Option<PathBuf>,
    connected: bool,
    created_inode: Option<(u64, u64)>,
    config: BridgeConfig,
}

impl BridgeSocket {
    /// Default permission mode for created socket paths.
    pub const DEFAULT_SOCKET_MODE: u32 = 0o600;
    /// Unix `sockaddr_un.sun_path` is 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind a datagram socket at `path` to receive notifications.
    ///
    /// A stale socket file at `path` is removed first. Any other kind of
    /// file is left alone and the bind fails.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind_with_config(path, BridgeConfig::default())
    }

    /// Bind with explicit configuration.
    pub fn bind_with_config(path: impl AsRef<Path>, config: BridgeConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        let bind_err = |source: std::io::Error| TransportError::Bind {
            path: path.clone(),
            source,
        };

        if let Ok(metadata) = std::fs::symlink_metadata(&path) {
            if metadata.file_type().is_socket() {
                debug!(?path, "removing stale bridge socket");
                std::fs::remove_file(&path).map_err(bind_err)?;
            } else {
                return Err(bind_err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "existing path is not a unix socket",
                )));
            }
        }

        let socket = UnixDatagram::bind(&path).map_err(bind_err)?;
        std::fs::set_permissions(
            &path,
            std::fs::Permissions::from_mode(Self::DEFAULT_SOCKET_MODE),
        )
        .map_err(bind_err)?;
        let created = std::fs::symlink_metadata(&path).map_err(bind_err)?;

        info!(?path, "bridge socket bound");

        let bridge = Self {
            socket,
            local_path: Some(path),
            peer: None,
            connected: false,
            created_inode: Some((created.dev(), created.ino())),
            config,
        };
        bridge.apply_timeouts()?;
        Ok(bridge)
    }

    /// Create an unbound socket that can only write commands to a peer.
    pub fn unbound(config: BridgeConfig) -> Result<Self> {
        let socket = UnixDatagram::unbound()?;
        let bridge = Self {
            socket,
            local_path: None,
            peer: None,
            connected: false,
            created_inode: None,
            config,
        };
        bridge.apply_timeouts()?;
        Ok(bridge)
    }

    /// Create a connected pair, e.g. a host end and a simulated hub end.
    pub fn pair() -> Result<(Self, Self)> {
        Self::pair_with_config(BridgeConfig::default())
    }

    /// Connected pair where both ends share `config`.
    pub fn pair_with_config(config: BridgeConfig) -> Result<(Self, Self)> {
        let (left, right) = UnixDatagram::pair()?;
        let wrap = |socket| -> Result<Self> {
            let bridge = Self {
                socket,
                local_path: None,
                peer: None,
                connected: true,
                created_inode: None,
                config: config.clone(),
            };
            bridge.apply_timeouts()?;
            Ok(bridge)
        };
        Ok((wrap(left)?, wrap(right)?))
    }

    /// Set the bridge path that command writes are sent to.
    pub fn with_peer(mut self, path: impl AsRef<Path>) -> Self {
        self.peer = Some(path.as_ref().to_path_buf());
        self
    }

    /// The path this socket is bound to, if any.
    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    /// The configured command destination, if any.
    pub fn peer(&self) -> Option<&Path> {
        self.peer.as_deref()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Send the zero-length link-down marker to the peer.
    ///
    /// Only meaningful when the receiving end enables
    /// [`BridgeConfig::empty_datagram_is_disconnect`].
    pub fn send_disconnect(&mut self) -> Result<()> {
        debug!("sending link-down marker");
        self.write_command(&[])
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "unix-datagram-bridge"
    }

    fn apply_timeouts(&self) -> Result<()> {
        self.socket.set_read_timeout(self.config.read_timeout)?;
        self.socket.set_write_timeout(self.config.write_timeout)?;
        Ok(())
    }
}

impl NotifySource for BridgeSocket {
    /// Receive one notification datagram.
    ///
    /// The datagram is returned with its real length, empty included. Only
    /// with [`BridgeConfig::empty_datagram_is_disconnect`] set does a
    /// zero-length datagram map to [`TransportError::Disconnected`].
    fn recv_notification(&mut self) -> Result<Bytes> {
        let max = self.config.max_datagram_size;
        let mut buf = BytesMut::zeroed(max + 1);
        let n = self.socket.recv(&mut buf)?;
        if n == 0 && self.config.empty_datagram_is_disconnect {
            debug!("bridge signalled disconnect");
            return Err(TransportError::Disconnected);
        }
        if n > max {
            return Err(TransportError::DatagramTooLarge { max });
        }
        buf.truncate(n);
        trace!(len = n, "notification datagram received");
        Ok(buf.freeze())
    }
}

impl CommandSink for BridgeSocket {
    fn write_command(&mut self, frame: &[u8]) -> Result<()> {
        let sent = match &self.peer {
            Some(peer) => self
                .socket
                .send_to(frame, peer)
                .map_err(|source| TransportError::Send {
                    path: peer.clone(),
                    source,
                })?,
            None if self.connected => self.socket.send(frame)?,
            None => return Err(TransportError::NoPeer),
        };
        if sent != frame.len() {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short datagram write ({sent} of {} bytes)", frame.len()),
            )));
        }
        trace!(len = sent, "command datagram sent");
        Ok(())
    }
}

impl Drop for BridgeSocket {
    fn drop(&mut self) {
        let (Some(path), Some((expected_dev, expected_ino))) =
            (&self.local_path, self.created_inode)
        else {
            return;
        };
        if let Ok(metadata) = std::fs::symlink_metadata(path) {
            if metadata.file_type().is_socket()
                && metadata.dev() == expected_dev
                && metadata.ino() == expected_ino
            {
                debug!(?path, "cleaning up bridge socket file");
                let _ = std::fs::remove_file(path);
            } else {
                debug!(?path, "bridge socket path identity changed; skipping cleanup");
            }
        }
    }
}

impl std::fmt::Debug for BridgeSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSocket")
            .field("local_path", &self.local_path)
            .field("peer", &self.peer)
            .field("connected", &self.connected)
            .finish()
    }
}
