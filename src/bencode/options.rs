use super::text::Encoding;

/// Settings for [`decode`](super::decode) and [`Decoder`](super::Decoder).
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{DecodeOptions, Encoding};
///
/// let options = DecodeOptions::new()
///     .strict(true)
///     .stringify(true)
///     .encoding(Encoding::Latin1)
///     .max_depth(16)
///     .max_string_length(1 << 20);
/// assert!(options.is_strict());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub(crate) stringify: bool,
    pub(crate) strict: bool,
    pub(crate) encoding: Encoding,
    pub(crate) max_string_length: Option<usize>,
    pub(crate) max_depth: Option<usize>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize byte strings as [`Value::Text`](super::Value::Text).
    pub fn stringify(mut self, stringify: bool) -> Self {
        self.stringify = stringify;
        self
    }

    /// Require ascending unique dictionary keys and reject trailing bytes.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Encoding for dictionary keys and stringified byte strings.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn max_string_length(mut self, limit: usize) -> Self {
        self.max_string_length = Some(limit);
        self
    }

    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_stringify(&self) -> bool {
        self.stringify
    }

    pub fn text_encoding(&self) -> Encoding {
        self.encoding
    }
}

/// Settings for [`encode`](super::encode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub(crate) stringify: bool,
    pub(crate) encoding: Encoding,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return [`Encoded::Text`](super::Encoded::Text) instead of raw bytes.
    pub fn stringify(mut self, stringify: bool) -> Self {
        self.stringify = stringify;
        self
    }

    /// Encoding for text values and dictionary keys, and for the output when
    /// stringifying.
    ///
    /// Under a single-byte encoding two distinct keys can map to the same
    /// bytes; encoding such a dictionary fails with
    /// [`ErrorKind::UnsupportedType`](super::ErrorKind::UnsupportedType).
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}
