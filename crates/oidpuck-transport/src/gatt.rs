//! GATT identifiers and the advertisement filter used to find a hub.
//!
//! The hub reuses the micro:bit UUID space. Only the UART service and its
//! two characteristics carry puck traffic; the rest of the catalogue exists
//! so discovery logs can name whatever the peripheral advertises.

use crate::error::{Result, TransportError};
use crate::hex::decode_hex;

/// Nordic UART service.
pub const UART_SERVICE: &str = "6e400001-b5a3-f393-e0a9-e50e24dcca9e";

/// Notify characteristic (hub → host, 20-byte notifications).
pub const TX_CHARACTERISTIC: &str = "6e400003-b5a3-f393-e0a9-e50e24dcca9e";

/// Write characteristic (host → hub, 16-byte commands).
pub const RX_CHARACTERISTIC: &str = "6e400002-b5a3-f393-e0a9-e50e24dcca9e";

/// Company identifier used in the manufacturer-data scan filter.
pub const FILTER_COMPANY_ID: u16 = 0xFFFF;

/// Length of a board code in hex digits.
pub const BOARD_CODE_LEN: usize = 6;

/// Services requested alongside the filter so they can be discovered later.
pub const SCAN_SERVICES: [&str; 4] = [
    "00001800-0000-1000-8000-00805f9b34fb",
    "00001801-0000-1000-8000-00805f9b34fb",
    "0000180a-0000-1000-8000-00805f9b34fb",
    UART_SERVICE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidKind {
    Service,
    Characteristic,
}

/// A named UUID from the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GattEntry {
    pub uuid: &'static str,
    pub name: &'static str,
    pub kind: UuidKind,
}

const fn service(uuid: &'static str, name: &'static str) -> GattEntry {
    GattEntry {
        uuid,
        name,
        kind: UuidKind::Service,
    }
}

const fn characteristic(uuid: &'static str, name: &'static str) -> GattEntry {
    GattEntry {
        uuid,
        name,
        kind: UuidKind::Characteristic,
    }
}

/// Every service and characteristic UUID the hub is known to expose.
pub const CATALOGUE: &[GattEntry] = &[
    service("00001800-0000-1000-8000-00805f9b34fb", "Generic Access"),
    service("00001801-0000-1000-8000-00805f9b34fb", "Generic Attribute"),
    service("0000180a-0000-1000-8000-00805f9b34fb", "Device Information"),
    service("e95d0753-251d-470a-a062-fa1922dfa9a8", "Accelerometer Service"),
    service("e95df2d8-251d-470a-a062-fa1922dfa9a8", "Magnetometer Service"),
    service("e95d9882-251d-470a-a062-fa1922dfa9a8", "Button Service"),
    service("e95dd91d-251d-470a-a062-fa1922dfa9a8", "LED Service"),
    service("e95d93af-251d-470a-a062-fa1922dfa9a8", "Event Service"),
    service("e95d93b0-251d-470a-a062-fa1922dfa9a8", "DFU Control Service"),
    service("e95d127b-251d-470a-a062-fa1922dfa9a8", "IO Pin Service"),
    service("e95d6100-251d-470a-a062-fa1922dfa9a8", "Temperature Service"),
    service(UART_SERVICE, "UART Service"),
    characteristic("00002a00-0000-1000-8000-00805f9b34fb", "Device Name"),
    characteristic("00002a01-0000-1000-8000-00805f9b34fb", "Appearance"),
    characteristic(
        "00002a04-0000-1000-8000-00805f9b34fb",
        "Peripheral Preferred Connection Parameters",
    ),
    characteristic("00002a05-0000-1000-8000-00805f9b34fb", "Service Changed"),
    characteristic("00002a24-0000-1000-8000-00805f9b34fb", "Model Number String"),
    characteristic("00002a25-0000-1000-8000-00805f9b34fb", "Serial Number String"),
    characteristic("00002a27-0000-1000-8000-00805f9b34fb", "Hardware Revision String"),
    characteristic("00002a26-0000-1000-8000-00805f9b34fb", "Firmware Revision String"),
    characteristic("00002a29-0000-1000-8000-00805f9b34fb", "Manufacturer Name String"),
    characteristic("e95dca4b-251d-470a-a062-fa1922dfa9a8", "Accelerometer Data"),
    characteristic("e95dfb24-251d-470a-a062-fa1922dfa9a8", "Accelerometer Period"),
    characteristic("e95dfb11-251d-470a-a062-fa1922dfa9a8", "Magnetometer Data"),
    characteristic("e95d386c-251d-470a-a062-fa1922dfa9a8", "Magnetometer Period"),
    characteristic("e95d9715-251d-470a-a062-fa1922dfa9a8", "Magnetometer Bearing"),
    characteristic("e95db358-251d-470a-a062-fa1922dfa9a8", "Magnetometer Calibration"),
    characteristic("e95dda90-251d-470a-a062-fa1922dfa9a8", "Button A State"),
    characteristic("e95dda91-251d-470a-a062-fa1922dfa9a8", "Button B State"),
    characteristic("e95d8d00-251d-470a-a062-fa1922dfa9a8", "Pin Data"),
    characteristic("e95d5899-251d-470a-a062-fa1922dfa9a8", "Pin AD Configuration"),
    characteristic("e95db9fe-251d-470a-a062-fa1922dfa9a8", "Pin IO Configuration"),
    characteristic("e95dd822-251d-470a-a062-fa1922dfa9a8", "PWM Control"),
    characteristic("e95d7b77-251d-470a-a062-fa1922dfa9a8", "LED Matrix State"),
    characteristic("e95d93ee-251d-470a-a062-fa1922dfa9a8", "LED Text"),
    characteristic("e95d0d2d-251d-470a-a062-fa1922dfa9a8", "Scrolling Delay"),
    characteristic("e95db84c-251d-470a-a062-fa1922dfa9a8", "MicroBit Requirements"),
    characteristic("e95d9775-251d-470a-a062-fa1922dfa9a8", "MicroBit Event"),
    characteristic("e95d23c4-251d-470a-a062-fa1922dfa9a8", "Client Requirements"),
    characteristic("e95d5404-251d-470a-a062-fa1922dfa9a8", "Client Event"),
    characteristic("e95d93b1-251d-470a-a062-fa1922dfa9a8", "DFU Control"),
    characteristic("e95d9250-251d-470a-a062-fa1922dfa9a8", "Temperature"),
    characteristic("e95d1b25-251d-470a-a062-fa1922dfa9a8", "Temperature Period"),
    characteristic(TX_CHARACTERISTIC, "Tx Characteristic"),
    characteristic(RX_CHARACTERISTIC, "Rx Characteristic"),
];

/// Find a catalogue entry by UUID (case-insensitive).
pub fn lookup_uuid(uuid: &str) -> Option<&'static GattEntry> {
    let uuid = uuid.trim();
    CATALOGUE
        .iter()
        .find(|entry| entry.uuid.eq_ignore_ascii_case(uuid))
}

/// Human-readable name for a UUID, falling back to an "unknown" label.
pub fn describe_uuid(uuid: &str, kind: UuidKind) -> &'static str {
    match lookup_uuid(uuid) {
        Some(entry) => entry.name,
        None => match kind {
            UuidKind::Service => "Unknown Service",
            UuidKind::Characteristic => "Unknown Characteristic",
        },
    }
}

/// Manufacturer-data advertisement filter that selects one hub.
///
/// Hubs advertise their board code under [`FILTER_COMPANY_ID`]. The code
/// bytes serve as both the data prefix and the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    pub company_identifier: u16,
    pub data_prefix: Vec<u8>,
    pub mask: Vec<u8>,
    pub optional_services: &'static [&'static str],
}

impl ScanFilter {
    /// Build the filter from a 6-hex-digit board code such as `"A1B2C3"`.
    pub fn from_board_code(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() != BOARD_CODE_LEN {
            return Err(TransportError::InvalidBoardCode(format!(
                "expected {BOARD_CODE_LEN} hex digits, got {}",
                code.len()
            )));
        }
        let bytes = parse_hex_bytes(code)?;
        Ok(Self {
            company_identifier: FILTER_COMPANY_ID,
            data_prefix: bytes.clone(),
            mask: bytes,
            optional_services: &SCAN_SERVICES,
        })
    }
}

/// Decode an even-length hex string into bytes.
pub fn parse_hex_bytes(hex: &str) -> Result<Vec<u8>> {
    decode_hex(hex).ok_or_else(|| {
        TransportError::InvalidBoardCode(format!("not an even-length hex string: {hex}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uart_pair_is_catalogued() {
        assert_eq!(lookup_uuid(UART_SERVICE).unwrap().name, "UART Service");
        let tx = lookup_uuid(TX_CHARACTERISTIC).unwrap();
        assert_eq!(tx.name, "Tx Characteristic");
        assert_eq!(tx.kind, UuidKind::Characteristic);
        assert_eq!(lookup_uuid(RX_CHARACTERISTIC).unwrap().name, "Rx Characteristic");
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let entry = lookup_uuid(" 6E400001-B5A3-F393-E0A9-E50E24DCCA9E ").unwrap();
        assert_eq!(entry.uuid, UART_SERVICE);
    }

    #[test]
    fn unknown_uuid_label_depends_on_kind() {
        let unknown = "12345678-0000-0000-0000-000000000000";
        assert_eq!(describe_uuid(unknown, UuidKind::Service), "Unknown Service");
        assert_eq!(
            describe_uuid(unknown, UuidKind::Characteristic),
            "Unknown Characteristic"
        );
        assert_eq!(
            describe_uuid("00002a00-0000-1000-8000-00805f9b34fb", UuidKind::Service),
            "Device Name"
        );
    }

    #[test]
    fn catalogue_has_no_duplicate_uuids() {
        for (i, a) in CATALOGUE.iter().enumerate() {
            for b in &CATALOGUE[i + 1..] {
                assert_ne!(a.uuid, b.uuid, "{} and {} share a uuid", a.name, b.name);
            }
        }
    }

    #[test]
    fn board_code_filter() {
        let filter = ScanFilter::from_board_code("a1B2c3").unwrap();
        assert_eq!(filter.company_identifier, 0xFFFF);
        assert_eq!(filter.data_prefix, vec![0xA1, 0xB2, 0xC3]);
        assert_eq!(filter.mask, filter.data_prefix);
        assert!(filter.optional_services.contains(&UART_SERVICE));
    }

    #[test]
    fn board_code_must_be_six_hex_digits() {
        assert!(matches!(
            ScanFilter::from_board_code("A1B2"),
            Err(TransportError::InvalidBoardCode(_))
        ));
        assert!(matches!(
            ScanFilter::from_board_code("A1B2ZZ"),
            Err(TransportError::InvalidBoardCode(_))
        ));
    }

    #[test]
    fn hex_bytes_reject_odd_length() {
        assert!(parse_hex_bytes("abc").is_err());
        assert_eq!(parse_hex_bytes("").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_hex_bytes("00ff").unwrap(), vec![0x00, 0xFF]);
    }
}
