//! The per-channel status byte.
//!
//! ```text
//!  bit  7    6 5       4 3       2 1 0
//!     ┌────┬───────┬─────────┬────────────┐
//!     │ C  │gesture│ charge  │ report tag │
//!     └────┴───────┴─────────┴────────────┘
//! ```
//!
//! Every one of the 256 values decodes; there is no invalid status byte.

use std::fmt;

pub const CONNECTED_BIT: u8 = 0x80;
pub const GESTURE_MASK: u8 = 0x60;
pub const CHARGE_MASK: u8 = 0x18;
pub const REPORT_TAG_MASK: u8 = 0x07;

/// Button gesture reported by the puck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonGesture {
    None,
    Press,
    Double,
    Long,
}

impl ButtonGesture {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Press => "PRESS",
            Self::Double => "DOUBLE",
            Self::Long => "LONG",
        }
    }
}

/// Charger state reported by the puck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeState {
    NoUsb,
    ChargingStop,
    Charging,
    ChargingError,
}

impl ChargeState {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoUsb => "NO USB",
            Self::ChargingStop => "CHARGING STOP",
            Self::Charging => "CHARGING",
            Self::ChargingError => "CHARGING ERROR!",
        }
    }
}

/// Decoded upper five bits of a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuckState {
    pub connected: bool,
    pub gesture: ButtonGesture,
    pub charge: ChargeState,
}

impl PuckState {
    pub fn decode(status: u8) -> Self {
        let gesture = match status & GESTURE_MASK {
            0x20 => ButtonGesture::Press,
            0x40 => ButtonGesture::Double,
            0x60 => ButtonGesture::Long,
            _ => ButtonGesture::None,
        };
        let charge = match status & CHARGE_MASK {
            0x08 => ChargeState::ChargingStop,
            0x10 => ChargeState::Charging,
            0x18 => ChargeState::ChargingError,
            _ => ChargeState::NoUsb,
        };
        Self {
            connected: status & CONNECTED_BIT != 0,
            gesture,
            charge,
        }
    }
}

impl fmt::Display for PuckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C:{} B:{} NPM:{}",
            if self.connected { "ON" } else { "OFF" },
            self.gesture.label(),
            self.charge.label()
        )
    }
}

/// How the four data bytes of a slice are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    /// Angle and position id. Any tag other than 1, 2 or 3.
    Position,
    /// Battery, volume and sound processor status (tag 1).
    Status,
    /// Sound bank checksum and highest sound index (tag 2).
    ChecksumIndex,
    /// 32-bit product identifier (tag 3).
    ProductId,
}

impl ReportType {
    pub fn from_status(status: u8) -> Self {
        match status & REPORT_TAG_MASK {
            1 => Self::Status,
            2 => Self::ChecksumIndex,
            3 => Self::ProductId,
            _ => Self::Position,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Status => "status",
            Self::ChecksumIndex => "checksum_index",
            Self::ProductId => "product_id",
        }
    }
}
