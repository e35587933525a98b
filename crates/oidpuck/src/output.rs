use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oidpuck_frame::{
    ChannelCommandRequest, ChannelIndex, ChannelReport, CommandFrame, LatchKind, Notification,
    ReportPayload, CHANNEL_COUNT,
};
use serde::Serialize;

pub const SCHEMA_BASE: &str = "https://schemas.oidpuck.dev/cli/v1";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn schema_id(name: &str) -> String {
    format!("{SCHEMA_BASE}/{name}.schema.json")
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

#[derive(Serialize)]
struct NotificationOutput {
    schema_id: String,
    sequence: u32,
    reports: Vec<ReportOutput>,
}

#[derive(Serialize)]
struct ReportOutput {
    channel: u8,
    raw: String,
    connected: bool,
    gesture: &'static str,
    charge: &'static str,
    report_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<PositionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<StatusOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latched: Option<&'static str>,
}

#[derive(Serialize)]
struct PositionOutput {
    angle: u16,
    position_id: u16,
}

#[derive(Serialize)]
struct StatusOutput {
    battery_raw: u16,
    voltage: f64,
    volume: u8,
    nsp_status: &'static str,
    product_id: Option<u32>,
    checksum: Option<u16>,
    max_index: Option<u16>,
}

impl From<&ChannelReport> for ReportOutput {
    fn from(report: &ChannelReport) -> Self {
        let (position, status, latched) = match &report.payload {
            ReportPayload::Position(p) => (
                Some(PositionOutput {
                    angle: p.angle,
                    position_id: p.position_id,
                }),
                None,
                None,
            ),
            ReportPayload::Status(s) => (
                None,
                Some(StatusOutput {
                    battery_raw: s.battery_raw,
                    voltage: s.voltage_display(),
                    volume: s.volume,
                    nsp_status: s.nsp_status.label(),
                    product_id: s.product_id,
                    checksum: s.checksum,
                    max_index: s.max_index,
                }),
                None,
            ),
            ReportPayload::LatchUpdate(kind) => (None, None, Some(latch_name(*kind))),
        };

        Self {
            channel: report.channel.get(),
            raw: report.raw_hex(),
            connected: report.puck.connected,
            gesture: report.puck.gesture.label(),
            charge: report.puck.charge.label(),
            report_type: report.report_type.name(),
            position,
            status,
            latched,
        }
    }
}

fn latch_name(kind: LatchKind) -> &'static str {
    match kind {
        LatchKind::ProductId => "product_id",
        LatchKind::ChecksumIndex => "checksum_index",
    }
}

pub fn print_notification(notification: &Notification, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&NotificationOutput {
            schema_id: schema_id("notification"),
            sequence: notification.sequence,
            reports: notification.reports.iter().map(ReportOutput::from).collect(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "CHANNEL", "PUCK", "TYPE", "DETAIL", "RAW"]);
            for report in &notification.reports {
                table.add_row(vec![
                    notification.sequence.to_string(),
                    report.channel.to_string(),
                    report.puck.to_string(),
                    report.report_type.name().to_string(),
                    report_detail(report),
                    report.raw_hex(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", receive_line(notification));
            for report in &notification.reports {
                println!("  {} {} {}", report.channel, report.puck, report_detail(report));
            }
        }
        OutputFormat::Raw => {
            let bytes: Vec<u8> = notification
                .reports
                .iter()
                .flat_map(|report| report.raw)
                .collect();
            print_raw(&bytes);
        }
    }
}

/// `(0007) ID1:0x0A0B0C0D81 ID2:0x... ID3:0x... ID4:0x...`
/// `(NNNN) ID1:0x… ID4:0x…`; the counter shows its last four digits.
pub fn receive_line(notification: &Notification) -> String {
    let mut line = format!("({:04})", notification.sequence % 10_000);
    for report in &notification.reports {
        let _ = write!(line, " {}:0x{}", report.channel, report.raw_hex());
    }
    line
}

pub fn report_detail(report: &ChannelReport) -> String {
    match &report.payload {
        ReportPayload::Position(p) => format!("angle={} position={}", p.angle, p.position_id),
        ReportPayload::Status(s) => format!(
            "battery={:.2}V volume={} nsp={} product={} checksum={} max_index={}",
            s.voltage_display(),
            s.volume,
            s.nsp_status.label(),
            or_dash(s.product_id.map(|v| format!("{v:08X}"))),
            or_dash(s.checksum.map(|v| format!("{v:04X}"))),
            or_dash(s.max_index.map(|v| v.to_string())),
        ),
        ReportPayload::LatchUpdate(kind) => format!("latched {}", latch_name(*kind)),
    }
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

#[derive(Serialize)]
struct RejectedOutput<'a> {
    schema_id: String,
    index: usize,
    /// `null` when the transport refused the datagram before measuring it.
    length: Option<usize>,
    error: &'a str,
}

pub fn print_rejected(index: usize, length: Option<usize>, error: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&RejectedOutput {
            schema_id: schema_id("rejected-frame"),
            index,
            length,
            error,
        }),
        OutputFormat::Table | OutputFormat::Pretty => match length {
            Some(length) => println!("frame {index} rejected ({length} bytes): {error}"),
            None => println!("frame {index} rejected: {error}"),
        },
        OutputFormat::Raw => {}
    }
}

#[derive(Serialize)]
struct CommandOutput {
    schema_id: String,
    bytes: String,
    channels: Vec<CommandSliceOutput>,
}

#[derive(Serialize)]
struct CommandSliceOutput {
    channel: u8,
    command: String,
    code: u8,
    slice: String,
}

pub fn print_command(
    requests: &[ChannelCommandRequest; CHANNEL_COUNT],
    frame: &CommandFrame,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&CommandOutput {
            schema_id: schema_id("command-frame"),
            bytes: hex_upper(frame.as_ref()),
            channels: ChannelIndex::ALL
                .iter()
                .zip(requests)
                .map(|(channel, request)| CommandSliceOutput {
                    channel: channel.get(),
                    command: request.to_string(),
                    code: frame.command_code(*channel),
                    slice: hex_upper(frame.slice(*channel)),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNEL", "COMMAND", "CODE", "SLICE"]);
            for (channel, request) in ChannelIndex::ALL.iter().zip(requests) {
                table.add_row(vec![
                    channel.to_string(),
                    request.to_string(),
                    format!("0x{:X}", frame.command_code(*channel)),
                    hex_upper(frame.slice(*channel)),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", write_line(frame)),
        OutputFormat::Raw => print_raw(frame.as_ref()),
    }
}

/// `Write: [0xB3 0xB2 0xB1 0xB0 ...]`, each slice listed high byte first.
pub fn write_line(frame: &CommandFrame) -> String {
    let bytes: Vec<String> = ChannelIndex::ALL
        .iter()
        .flat_map(|channel| frame.slice(*channel).iter().rev())
        .map(|b| format!("0x{b:02X}"))
        .collect();
    format!("Write: [{}]", bytes.join(" "))
}

pub fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
