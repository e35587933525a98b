use std::fs;

use oidpuck_frame::{decode_notification, FrameError, Notification, Session};
use oidpuck_transport::decode_hex;
use tracing::warn;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_notification, print_rejected, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut inputs = args.frames;
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        inputs.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    let frames = inputs
        .iter()
        .map(|input| parse_hex(input))
        .collect::<CliResult<Vec<_>>>()?;

    let mut session = Session::new();
    let mut rejected = 0usize;
    for (index, bytes) in frames.iter().enumerate() {
        match decode_notification(bytes, &mut session) {
            Ok(reports) => {
                let notification = Notification {
                    sequence: session.frame_counter(),
                    reports,
                };
                print_notification(&notification, format);
            }
            Err(err @ FrameError::InvalidLength { .. }) => {
                warn!(index, len = bytes.len(), "rejected notification");
                print_rejected(index, Some(bytes.len()), &err.to_string(), format);
                rejected += 1;
            }
            Err(err) => return Err(frame_error("decode failed", err)),
        }
    }

    if rejected > 0 {
        Err(CliError::new(
            DATA_INVALID,
            format!("{rejected} of {} notifications rejected", frames.len()),
        ))
    } else {
        Ok(SUCCESS)
    }
}

/// Hex bytes with optional `0x` prefixes and space, colon or dash separators.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == ',')
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();

    decode_hex(&digits)
        .ok_or_else(|| CliError::new(USAGE, format!("not a hex byte string: {input:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_hex_spellings() {
        assert_eq!(parse_hex("0a0B").unwrap(), vec![0x0A, 0x0B]);
        assert_eq!(parse_hex("0x01 0x02 0x03").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_hex("01:02-03,04").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("+1").unwrap_err().code, USAGE);
    }
}
