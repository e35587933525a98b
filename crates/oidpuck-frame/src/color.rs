use std::fmt;
use std::str::FromStr;

use oidpuck_transport::decode_hex;

use crate::error::{FrameError, Result};

/// An 8-bit-per-channel LED color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`, hex digits in either case.
    pub fn parse(input: &str) -> Result<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        match decode_hex(digits).as_deref() {
            Some(&[r, g, b]) => Ok(Self::new(r, g, b)),
            _ => Err(FrameError::InvalidColor(input.to_string())),
        }
    }
}

impl FromStr for Rgb {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
