use std::fmt;

use thiserror::Error;

/// Machine-readable classification shared by decode and encode failures.
///
/// Match on this instead of parsing error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No input bytes were supplied (decode).
    EmptyInput,
    /// The buffer ran out in the middle of a value (decode).
    UnexpectedEnd,
    /// A byte that cannot start or continue a value (decode).
    InvalidFormat,
    /// An integer written with superfluous leading zeros (decode).
    LeadingZeros,
    /// The integer `-0` (decode).
    NegativeZero,
    /// Dictionary keys not strictly ascending (strict decode).
    UnsortedKeys,
    /// Bytes left over after the top-level value (strict decode).
    TrailingData,
    /// Nesting deeper than the configured limit (decode).
    MaxDepthExceeded,
    /// A byte string longer than the configured limit (decode).
    MaxSizeExceeded,
    /// A value with no bencode representation (encode).
    UnsupportedType,
    /// A container that contains itself (encode).
    CircularReference,
}

impl ErrorKind {
    /// Stable code string, e.g. `"UNEXPECTED_END"`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "EMPTY_INPUT",
            ErrorKind::UnexpectedEnd => "UNEXPECTED_END",
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::LeadingZeros => "LEADING_ZEROS",
            ErrorKind::NegativeZero => "NEGATIVE_ZERO",
            ErrorKind::UnsortedKeys => "UNSORTED_KEYS",
            ErrorKind::TrailingData => "TRAILING_DATA",
            ErrorKind::MaxDepthExceeded => "MAX_DEPTH_EXCEEDED",
            ErrorKind::MaxSizeExceeded => "MAX_SIZE_EXCEEDED",
            ErrorKind::UnsupportedType => "UNSUPPORTED_TYPE",
            ErrorKind::CircularReference => "CIRCULAR_REFERENCE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A failure while decoding bencode input.
///
/// `position` is the byte offset where the problem was detected. It is
/// `None` only for [`ErrorKind::EmptyInput`] and [`ErrorKind::TrailingData`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    kind: ErrorKind,
    position: Option<usize>,
    message: String,
}

impl DecodeError {
    pub(crate) fn new(kind: ErrorKind, position: Option<usize>, message: String) -> Self {
        Self {
            kind,
            position,
            message,
        }
    }

    pub(crate) fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput, None, "input is empty".into())
    }

    pub(crate) fn trailing_data(remaining: usize) -> Self {
        Self::new(
            ErrorKind::TrailingData,
            None,
            format!("{remaining} unconsumed byte(s) after the top-level value"),
        )
    }

    /// Builds an error at `pos`, rendering the byte found there (if any).
    pub(crate) fn at(kind: ErrorKind, data: &[u8], pos: usize, what: &str) -> Self {
        let message = match data.get(pos) {
            Some(&b) => format!("{what} at position {pos} (byte {})", render_byte(b)),
            None => format!("{what} at position {pos}"),
        };
        Self::new(kind, Some(pos), message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One step on the route from the root of an encoded tree to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{k:?}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        PathSegment::Key(k.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// A failure while encoding a value tree.
///
/// `path` leads from the root to the offending value; it is empty when the
/// root itself is at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EncodeError {
    kind: ErrorKind,
    path: Vec<PathSegment>,
    message: String,
}

impl EncodeError {
    pub(crate) fn new(kind: ErrorKind, path: &[PathSegment], what: &str) -> Self {
        let message = if path.is_empty() {
            format!("{what} at root")
        } else {
            let route: Vec<String> = path.iter().map(ToString::to_string).collect();
            format!("{what} at path [{}]", route.join(", "))
        };
        Self {
            kind,
            path: path.to_vec(),
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BencodeError {
    /// The error kind, if this is a codec error rather than an I/O failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            BencodeError::Decode(e) => Some(e.kind()),
            BencodeError::Encode(e) => Some(e.kind()),
            BencodeError::Io(_) => None,
        }
    }
}

fn render_byte(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        format!("'{}'", b as char)
    } else {
        format!("0x{b:02x}")
    }
}
