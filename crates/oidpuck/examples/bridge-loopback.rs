//! Plays both sides of a bridge over a socket pair: a fake hub pushes
//! notifications, the app decodes them and answers with a command.
//!
//! Run with:
//!   cargo run --example bridge-loopback

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use oidpuck::frame::{
        ChannelCommandRequest, CommandWriter, NotificationReader, ReportPayload, Rgb,
        NOTIFICATION_SIZE,
    };
    use oidpuck::transport::{BridgeSocket, CommandSink, NotifySource};

    let (mut hub, app) = BridgeSocket::pair()?;

    // Product id on ID1, then a status report on ID1 and a position on ID2.
    let mut first = [0u8; NOTIFICATION_SIZE];
    first[..5].copy_from_slice(&[0x78, 0x56, 0x34, 0x12, 0x83]);
    let mut second = [0u8; NOTIFICATION_SIZE];
    second[..5].copy_from_slice(&[0x84, 0x03, 0x0A, 0x00, 0x81]);
    second[5..10].copy_from_slice(&[0x2A, 0x00, 0x5A, 0x00, 0xA0]);
    hub.write_command(&first)?;
    hub.write_command(&second)?;

    let mut reader = NotificationReader::new(app);
    for _ in 0..2 {
        let notification = reader.read_notification()?;
        for report in &notification.reports {
            match &report.payload {
                ReportPayload::Status(status) => eprintln!(
                    "{} {} battery={:.2}V volume={} product={:?}",
                    report.channel,
                    report.puck,
                    status.voltage_display(),
                    status.volume,
                    status.product_id.map(|id| format!("{id:08X}")),
                ),
                ReportPayload::Position(position) => eprintln!(
                    "{} {} angle={} position={}",
                    report.channel, report.puck, position.angle, position.position_id
                ),
                ReportPayload::LatchUpdate(kind) => {
                    eprintln!("{} latched {kind:?}", report.channel)
                }
            }
        }
    }

    let mut writer = CommandWriter::new(reader.into_inner());
    let frame = writer.send(&[
        ChannelCommandRequest::LedSet {
            color: Rgb::parse("#00FF00")?,
            pattern: 1,
        },
        ChannelCommandRequest::AudioSet {
            index: 3,
            volume: 8,
            looped: false,
        },
        ChannelCommandRequest::AudioInfoGet,
        ChannelCommandRequest::default(),
    ])?;

    let received = hub.recv_notification()?;
    assert_eq!(received.as_ref(), frame.as_ref());
    eprintln!("hub received {} command bytes", received.len());
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("bridge-loopback needs Unix datagram sockets");
}
