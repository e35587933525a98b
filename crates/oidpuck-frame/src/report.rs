use crate::channel::{ChannelIndex, CHANNEL_COUNT, NOTIFY_SLICE_SIZE};
use crate::status::{PuckState, ReportType};

/// Full-scale battery reading.
pub const BATTERY_FULL_SCALE: f64 = 1023.0;

/// Battery voltage at full scale.
pub const BATTERY_REFERENCE_VOLTS: f64 = 4.2;

/// Sound processor status from a status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NspStatus {
    Ready,
    Error,
}

impl NspStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Error => "Error!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionReport {
    /// Degrees. Nominally 0..=359; a 9-bit field, so up to 511 passes through.
    pub angle: u16,
    pub position_id: u16,
}

/// Battery, volume and sound processor state, joined with the channel latch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusDataReport {
    pub battery_raw: u16,
    pub voltage: f64,
    pub volume: u8,
    pub nsp_status: NspStatus,
    /// `None` until a product-id report has been seen on this channel.
    pub product_id: Option<u32>,
    /// `None` until a checksum/index report has been seen on this channel.
    pub checksum: Option<u16>,
    pub max_index: Option<u16>,
}

impl StatusDataReport {
    /// Voltage rounded to two decimals for display.
    pub fn voltage_display(&self) -> f64 {
        (self.voltage * 100.0).round() / 100.0
    }
}

/// Convert a raw battery reading to volts.
pub fn battery_voltage(raw: u16) -> f64 {
    f64::from(raw) * BATTERY_REFERENCE_VOLTS / BATTERY_FULL_SCALE
}

/// Which latch a product-id or checksum report updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatchKind {
    ProductId,
    ChecksumIndex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportPayload {
    Position(PositionReport),
    Status(StatusDataReport),
    /// The slice only fed the session latch.
    LatchUpdate(LatchKind),
}

/// Everything decoded from one channel slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReport {
    pub channel: ChannelIndex,
    pub puck: PuckState,
    pub report_type: ReportType,
    pub payload: ReportPayload,
    /// The slice exactly as received, status byte last.
    pub raw: [u8; NOTIFY_SLICE_SIZE],
}

impl ChannelReport {
    /// Uppercase hex of the raw slice, e.g. `"0A0B0C0D81"`.
    pub fn raw_hex(&self) -> String {
        self.raw.iter().map(|b| format!("{b:02X}")).collect()
    }

    pub fn position(&self) -> Option<&PositionReport> {
        match &self.payload {
            ReportPayload::Position(p) => Some(p),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&StatusDataReport> {
        match &self.payload {
            ReportPayload::Status(s) => Some(s),
            _ => None,
        }
    }
}

/// One decoded notification with its session sequence number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notification {
    pub sequence: u32,
    pub reports: [ChannelReport; CHANNEL_COUNT],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_endpoints() {
        assert_eq!(battery_voltage(0), 0.0);
        assert!((battery_voltage(1023) - 4.2).abs() < 1e-9);
    }

    #[test]
    fn voltage_is_monotonic() {
        let mut last = battery_voltage(0);
        for raw in 1..=u16::MAX {
            let v = battery_voltage(raw);
            assert!(v >= last, "voltage dropped at raw={raw}");
            last = v;
        }
    }

    #[test]
    fn voltage_display_rounds_to_centivolts() {
        let report = |raw| StatusDataReport {
            battery_raw: raw,
            voltage: battery_voltage(raw),
            volume: 0,
            nsp_status: NspStatus::Ready,
            product_id: None,
            checksum: None,
            max_index: None,
        };
        assert_eq!(report(1023).voltage_display(), 4.2);
        assert_eq!(report(0).voltage_display(), 0.0);
        // 900 * 4.2 / 1023 = 3.6950...
        assert_eq!(report(900).voltage_display(), 3.7);
    }

    #[test]
    fn raw_hex_is_uppercase_and_ordered() {
        let report = ChannelReport {
            channel: ChannelIndex::ONE,
            puck: PuckState::decode(0x81),
            report_type: ReportType::Status,
            payload: ReportPayload::LatchUpdate(LatchKind::ProductId),
            raw: [0x0A, 0xFF, 0x00, 0x1b, 0x81],
        };
        assert_eq!(report.raw_hex(), "0AFF001B81");
        assert!(report.position().is_none());
        assert!(report.status().is_none());
    }
}
