//! Decodes a raw UART byte stream with `PuckCodec`. One end of a stream pair
//! plays the hub and writes notifications split at arbitrary points; the
//! other end reads whole notifications and answers with a command frame.
//!
//! Run with:
//!   cargo run --example uart-stream --features async

#[cfg(unix)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use futures_util::{SinkExt, StreamExt};
    use oidpuck::frame::{
        ChannelCommandRequest, PuckCodec, ReportPayload, COMMAND_SIZE, NOTIFICATION_SIZE,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixStream;
    use tokio_util::codec::Framed;

    let (mut hub, app) = UnixStream::pair()?;
    let mut framed = Framed::new(app, PuckCodec::new());

    // Product id on ID2, then a status report on ID2.
    let mut bytes = vec![0u8; 2 * NOTIFICATION_SIZE];
    bytes[5..10].copy_from_slice(&[0xEF, 0xBE, 0xAD, 0xDE, 0x83]);
    bytes[NOTIFICATION_SIZE + 5..NOTIFICATION_SIZE + 10]
        .copy_from_slice(&[0x10, 0x03, 0x04, 0x00, 0x81]);

    hub.write_all(&bytes[..7]).await?;
    hub.write_all(&bytes[7..31]).await?;
    hub.write_all(&bytes[31..]).await?;

    for _ in 0..2 {
        let notification = framed.next().await.ok_or("stream closed")??;
        let report = &notification.reports[1];
        match &report.payload {
            ReportPayload::Status(status) => eprintln!(
                "({:04}) {} battery={:.2}V product={:?}",
                notification.sequence,
                report.channel,
                status.voltage_display(),
                status.product_id.map(|id| format!("{id:08X}")),
            ),
            other => eprintln!("({:04}) {} {other:?}", notification.sequence, report.channel),
        }
    }

    framed
        .send([
            ChannelCommandRequest::default(),
            ChannelCommandRequest::AudioInfoGet,
            ChannelCommandRequest::default(),
            ChannelCommandRequest::default(),
        ])
        .await?;

    let mut command = [0u8; COMMAND_SIZE];
    hub.read_exact(&mut command).await?;
    eprintln!("hub received {command:02X?}");
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("uart-stream needs Unix stream sockets");
}
