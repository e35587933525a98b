//! Transport contract for talking to an OID puck hub.
//!
//! The hub exposes a BLE UART-style characteristic pair:
//! - TX (notify): 20-byte notifications carrying four channel slices
//! - RX (write): 16-byte command frames carrying four channel slices
//!
//! This is the lowest layer of oidpuck. BLE connection setup and discovery
//! stay outside; everything above this crate only sees the [`NotifySource`]
//! and [`CommandSink`] traits. [`BridgeSocket`] implements both over a Unix
//! datagram socket for hosts where a separate bridge process owns the radio.

pub mod error;
pub mod gatt;
pub mod hex;
pub mod traits;

#[cfg(unix)]
pub mod bridge;

pub use error::{Result, TransportError};
pub use gatt::{
    describe_uuid, lookup_uuid, GattEntry, ScanFilter, UuidKind, RX_CHARACTERISTIC,
    TX_CHARACTERISTIC, UART_SERVICE,
};
pub use hex::decode_hex;
pub use traits::{CommandSink, NotifySource};

#[cfg(unix)]
pub use bridge::{BridgeConfig, BridgeSocket};
