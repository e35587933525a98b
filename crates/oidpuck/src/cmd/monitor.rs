use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use oidpuck_frame::{FrameError, NotificationReader};
use oidpuck_transport::{BridgeConfig, BridgeSocket, TransportError};
use tracing::info;

use crate::cmd::MonitorArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::{print_notification, print_rejected, OutputFormat};

/// How often a blocked receive wakes up to check for Ctrl-C.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let idle_timeout = args.timeout.as_deref().map(parse_duration).transpose()?;

    let config = BridgeConfig {
        read_timeout: Some(POLL_INTERVAL),
        empty_datagram_is_disconnect: args.disconnect_marker,
        ..BridgeConfig::default()
    };
    let socket = BridgeSocket::bind_with_config(&args.path, config)
        .map_err(|err| transport_error("bind failed", err))?;
    let mut reader = NotificationReader::new(socket);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut received = 0usize;
    let mut decoded = 0usize;
    let mut last_activity = Instant::now();

    while running.load(Ordering::SeqCst) {
        match reader.read_notification() {
            Ok(notification) => {
                received += 1;
                decoded += 1;
                last_activity = Instant::now();
                print_notification(&notification, format);

                if args.count.is_some_and(|count| decoded >= count) {
                    return Ok(SUCCESS);
                }
            }
            Err(err) if err.is_rejected_frame() => {
                print_rejected(received, err.rejected_length(), &err.to_string(), format);
                received += 1;
                last_activity = Instant::now();
            }
            Err(FrameError::Transport(TransportError::Disconnected)) => {
                info!("bridge reported disconnect; session reset");
                last_activity = Instant::now();
            }
            Err(FrameError::Transport(TransportError::Io(err))) if is_poll_timeout(&err) => {
                if idle_timeout.is_some_and(|limit| last_activity.elapsed() >= limit) {
                    return Err(CliError::new(
                        TIMEOUT,
                        format!("no notification within {:?}", last_activity.elapsed()),
                    ));
                }
            }
            Err(err) => return Err(frame_error("receive failed", err)),
        }
    }

    Ok(SUCCESS)
}

fn is_poll_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
