//! Hex text helpers shared by board codes, colors and captured frames.

/// Decode an even-length string of hex digits, either case, into bytes.
///
/// Returns `None` for an odd length or any non-hex character. Signs and
/// `0x` prefixes are not accepted; callers strip their own separators.
pub fn decode_hex(digits: &str) -> Option<Vec<u8>> {
    if digits.len() % 2 != 0 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}
