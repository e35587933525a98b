//! Notification decoding.
//!
//! Wire format of one notification:
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┐
//! │ ID1 (5B)     │ ID2 (5B)     │ ID3 (5B)     │ ID4 (5B)     │
//! └──────────────┴──────────────┴──────────────┴──────────────┘
//!   each slice: d0 d1 d2 d3 status
//! ```
//!
//! | tag | d0 d1                 | d2 d3                          |
//! |-----|-----------------------|--------------------------------|
//! | 1   | battery (LE)          | volume, bit0 = sound error     |
//! | 2   | checksum (LE)         | max index (LE)                 |
//! | 3   | product id, d3 most significant ... d0 least            |
//! | *   | position id (LE)      | angle (LE, low 9 bits)         |

use tracing::debug;

use crate::channel::{ChannelIndex, NOTIFY_SLICE_SIZE};
use crate::error::{FrameError, Result};
use crate::report::{
    battery_voltage, ChannelReport, LatchKind, NspStatus, PositionReport, ReportPayload,
    StatusDataReport,
};
use crate::session::Session;
use crate::status::{PuckState, ReportType};

/// Notification size on the wire.
pub const NOTIFICATION_SIZE: usize = 20;

/// Mask for the 9-bit angle field.
pub const ANGLE_MASK: u16 = 0x01FF;

/// Decode one notification, updating `session` latches.
///
/// Any 20-byte input decodes; a different length fails with
/// [`FrameError::InvalidLength`] and leaves `session` untouched.
pub fn decode_notification(frame: &[u8], session: &mut Session) -> Result<[ChannelReport; 4]> {
    let frame: &[u8; NOTIFICATION_SIZE] =
        frame.try_into().map_err(|_| FrameError::InvalidLength {
            expected: NOTIFICATION_SIZE,
            actual: frame.len(),
        })?;

    let reports = ChannelIndex::ALL.map(|channel| {
        let offset = channel.notify_offset();
        let mut slice = [0u8; NOTIFY_SLICE_SIZE];
        slice.copy_from_slice(&frame[offset..offset + NOTIFY_SLICE_SIZE]);
        decode_slice(channel, slice, session)
    });

    let sequence = session.advance();
    debug!(
        sequence,
        id1 = reports[0].report_type.name(),
        id2 = reports[1].report_type.name(),
        id3 = reports[2].report_type.name(),
        id4 = reports[3].report_type.name(),
        "decoded notification"
    );
    Ok(reports)
}

/// Decode a single channel slice against that channel's latch.
pub fn decode_slice(
    channel: ChannelIndex,
    slice: [u8; NOTIFY_SLICE_SIZE],
    session: &mut Session,
) -> ChannelReport {
    let [d0, d1, d2, d3, status] = slice;
    let report_type = ReportType::from_status(status);

    let payload = match report_type {
        ReportType::ProductId => {
            session
                .latch_mut(channel)
                .record_product_id(u32::from_be_bytes([d3, d2, d1, d0]));
            ReportPayload::LatchUpdate(LatchKind::ProductId)
        }
        ReportType::ChecksumIndex => {
            session
                .latch_mut(channel)
                .record_checksum_index(u16::from_le_bytes([d0, d1]), u16::from_le_bytes([d2, d3]));
            ReportPayload::LatchUpdate(LatchKind::ChecksumIndex)
        }
        ReportType::Status => {
            let battery_raw = u16::from_le_bytes([d0, d1]);
            let latch = session.latch(channel);
            ReportPayload::Status(StatusDataReport {
                battery_raw,
                voltage: battery_voltage(battery_raw),
                volume: d2,
                nsp_status: if d3 & 0x01 != 0 {
                    NspStatus::Error
                } else {
                    NspStatus::Ready
                },
                product_id: latch.product_id(),
                checksum: latch.checksum(),
                max_index: latch.max_index(),
            })
        }
        ReportType::Position => ReportPayload::Position(PositionReport {
            angle: position_angle(d2, d3),
            position_id: u16::from_le_bytes([d0, d1]),
        }),
    };

    ChannelReport {
        channel,
        puck: PuckState::decode(status),
        report_type,
        payload,
        raw: slice,
    }
}

/// Extract the 9-bit angle from the two high data bytes.
pub fn position_angle(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high]) & ANGLE_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(channel: ChannelIndex, slice: [u8; 5]) -> [u8; NOTIFICATION_SIZE] {
        let mut frame = [0u8; NOTIFICATION_SIZE];
        let offset = channel.notify_offset();
        frame[offset..offset + 5].copy_from_slice(&slice);
        frame
    }

    #[test]
    fn rejects_wrong_lengths_without_touching_session() {
        let mut session = Session::new();
        session.latch_mut(ChannelIndex::ONE).record_product_id(42);
        let before = session.clone();

        for len in [0usize, 1, 16, 19, 21, 40] {
            let buf = vec![0x03u8; len];
            let err = decode_notification(&buf, &mut session).unwrap_err();
            assert!(matches!(
                err,
                FrameError::InvalidLength { expected: 20, actual } if actual == len
            ));
        }

        assert_eq!(session.frame_counter(), before.frame_counter());
        assert_eq!(
            session.latch(ChannelIndex::ONE),
            before.latch(ChannelIndex::ONE)
        );
    }

    #[test]
    fn any_twenty_bytes_decode() {
        let mut session = Session::new();
        for fill in 0..=u8::MAX {
            let frame = [fill; NOTIFICATION_SIZE];
            let reports = decode_notification(&frame, &mut session).unwrap();
            for (report, channel) in reports.iter().zip(ChannelIndex::ALL) {
                assert_eq!(report.channel, channel);
                assert_eq!(report.raw, [fill; 5]);
            }
        }
        assert_eq!(session.frame_counter(), 256);
    }

    #[test]
    fn position_report() {
        let mut session = Session::new();
        // position id 0x0201, angle 0x0167 = 359, status: connected, tag 0
        let frame = frame_with(ChannelIndex::ONE, [0x01, 0x02, 0x67, 0x01, 0x80]);
        let reports = decode_notification(&frame, &mut session).unwrap();

        let report = &reports[0];
        assert_eq!(report.report_type, ReportType::Position);
        assert!(report.puck.connected);
        assert_eq!(
            report.position(),
            Some(&PositionReport {
                angle: 359,
                position_id: 0x0201
            })
        );
        assert_eq!(report.raw_hex(), "0102670180");
    }

    #[test]
    fn angle_masks_to_nine_bits() {
        assert_eq!(position_angle(0xFF, 0xFF), 0x1FF);
        assert_eq!(position_angle(0x00, 0xFE), 0);
        assert_eq!(position_angle(0x68, 0x01), 360);
    }

    #[test]
    fn out_of_range_angle_passes_through() {
        let mut session = Session::new();
        let frame = frame_with(ChannelIndex::TWO, [0, 0, 0xFF, 0xFF, 0x07]);
        let reports = decode_notification(&frame, &mut session).unwrap();
        assert_eq!(reports[1].position().unwrap().angle, 511);
    }

    #[test]
    fn status_report_before_latches_has_unknown_fields() {
        let mut session = Session::new();
        // battery 1023 (0x03FF), volume 7, sound error bit set
        let frame = frame_with(ChannelIndex::FOUR, [0xFF, 0x03, 0x07, 0x01, 0x01]);
        let reports = decode_notification(&frame, &mut session).unwrap();

        let status = reports[3].status().unwrap();
        assert_eq!(status.battery_raw, 1023);
        assert_eq!(status.voltage_display(), 4.2);
        assert_eq!(status.volume, 7);
        assert_eq!(status.nsp_status, NspStatus::Error);
        assert_eq!(status.product_id, None);
        assert_eq!(status.checksum, None);
        assert_eq!(status.max_index, None);
    }

    #[test]
    fn nsp_ready_when_bit_clear() {
        let mut session = Session::new();
        let frame = frame_with(ChannelIndex::ONE, [0, 0, 0, 0xFE, 0x01]);
        let reports = decode_notification(&frame, &mut session).unwrap();
        assert_eq!(reports[0].status().unwrap().nsp_status, NspStatus::Ready);
    }

    #[test]
    fn product_id_latch_feeds_later_status() {
        let mut session = Session::new();

        let pid = frame_with(ChannelIndex::THREE, [0x44, 0x33, 0x22, 0x11, 0x03]);
        let reports = decode_notification(&pid, &mut session).unwrap();
        assert_eq!(
            reports[2].payload,
            ReportPayload::LatchUpdate(LatchKind::ProductId)
        );
        assert_eq!(
            session.latch(ChannelIndex::THREE).product_id(),
            Some(0x1122_3344)
        );

        let status = frame_with(ChannelIndex::THREE, [0x00, 0x02, 0x10, 0x00, 0x01]);
        let reports = decode_notification(&status, &mut session).unwrap();
        assert_eq!(reports[2].status().unwrap().product_id, Some(0x1122_3344));
        // other channels never saw a product id
        assert_eq!(session.latch(ChannelIndex::ONE).product_id(), None);
    }

    #[test]
    fn checksum_index_latch() {
        let mut session = Session::new();
        let cs = frame_with(ChannelIndex::TWO, [0xCD, 0xAB, 0x2C, 0x01, 0x02]);
        decode_notification(&cs, &mut session).unwrap();

        let latch = session.latch(ChannelIndex::TWO);
        assert_eq!(latch.checksum(), Some(0xABCD));
        assert_eq!(latch.max_index(), Some(300));

        let status = frame_with(ChannelIndex::TWO, [0, 0, 0, 0, 0x01]);
        let reports = decode_notification(&status, &mut session).unwrap();
        let report = reports[1].status().unwrap();
        assert_eq!(report.checksum, Some(0xABCD));
        assert_eq!(report.max_index, Some(300));
    }

    #[test]
    fn puck_state_rides_on_every_report_type() {
        let mut session = Session::new();
        let mut frame = [0u8; NOTIFICATION_SIZE];
        frame[4] = 0xE0; // position, long press
        frame[9] = 0xA1; // status, press
        frame[14] = 0xCA; // checksum, double, charging stop
        frame[19] = 0x93; // product id, charging

        let reports = decode_notification(&frame, &mut session).unwrap();
        let states: Vec<String> = reports.iter().map(|r| r.puck.to_string()).collect();
        assert_eq!(
            states,
            vec![
                "C:ON B:LONG NPM:NO USB",
                "C:ON B:PRESS NPM:NO USB",
                "C:ON B:DOUBLE NPM:CHARGING STOP",
                "C:ON B:NONE NPM:CHARGING",
            ]
        );
    }

    #[test]
    fn decoding_is_deterministic_for_equal_sessions() {
        let mut warm = Session::new();
        let pid = frame_with(ChannelIndex::ONE, [1, 2, 3, 4, 0x03]);
        decode_notification(&pid, &mut warm).unwrap();

        let mut a = warm.clone();
        let mut b = warm;
        let status = frame_with(ChannelIndex::ONE, [9, 0, 5, 0, 0x01]);
        assert_eq!(
            decode_notification(&status, &mut a).unwrap(),
            decode_notification(&status, &mut b).unwrap()
        );
    }
}
