use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Character encoding used when byte strings are materialized as text.
///
/// `Latin1` and `Binary` are the same single-byte mapping (byte `n` is code
/// point `U+00nn`). `Ascii` behaves like `Latin1` when encoding and clears
/// the high bit of every byte when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Binary,
    Ascii,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown encoding: {0}")]
pub struct ParseEncodingError(String);

impl FromStr for Encoding {
    type Err = ParseEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "latin1" => Ok(Encoding::Latin1),
            "binary" => Ok(Encoding::Binary),
            "ascii" => Ok(Encoding::Ascii),
            _ => Err(ParseEncodingError(s.to_owned())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "utf8",
            Encoding::Latin1 => "latin1",
            Encoding::Binary => "binary",
            Encoding::Ascii => "ascii",
        })
    }
}

impl Encoding {
    fn is_single_byte(self) -> bool {
        !matches!(self, Encoding::Utf8)
    }

    /// Converts text to bytes. Single-byte encodings keep the low byte of
    /// each code point.
    pub fn encode_str(self, s: &str) -> Cow<'_, [u8]> {
        if !self.is_single_byte() || s.is_ascii() {
            return Cow::Borrowed(s.as_bytes());
        }
        Cow::Owned(s.chars().map(|c| (c as u32 & 0xff) as u8).collect())
    }

    /// Converts bytes to text. Invalid UTF-8 is replaced with U+FFFD.
    pub fn decode_bytes(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes),
            _ if bytes.is_ascii() => {
                // ASCII is valid UTF-8 and maps to itself in every encoding here.
                Cow::Borrowed(std::str::from_utf8(bytes).unwrap_or_default())
            }
            Encoding::Latin1 | Encoding::Binary => {
                Cow::Owned(bytes.iter().map(|&b| b as char).collect())
            }
            Encoding::Ascii => Cow::Owned(bytes.iter().map(|&b| (b & 0x7f) as char).collect()),
        }
    }
}

/// Number of bytes `s` occupies under `encoding`.
pub fn byte_len(s: &str, encoding: Encoding) -> usize {
    if encoding.is_single_byte() {
        s.chars().count()
    } else {
        s.len()
    }
}

/// Byte-lexicographic comparison: element-wise by raw value, shorter prefix first.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}
