//! Frame codec and bridge tooling for four-channel OID puck hubs.
//!
//! A hub multiplexes four pucks over one BLE UART characteristic pair. This
//! crate decodes the hub's 20-byte notifications into per-channel reports and
//! builds its 16-byte command frames.
//!
//! # Crate Structure
//!
//! - [`transport`]: notify/write traits, GATT UUIDs, scan filter, Unix bridge socket
//! - [`frame`]: notification decoder, command encoder, session latches

/// Re-export transport types.
pub mod transport {
    pub use oidpuck_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use oidpuck_frame::*;
}
