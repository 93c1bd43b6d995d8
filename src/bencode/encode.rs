use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use super::error::{BencodeError, EncodeError, ErrorKind, PathSegment};
use super::item::{Encodable, SharedDict, SharedList};
use super::options::EncodeOptions;
use super::text;
use crate::constants::{
    DICT_START, END, INTEGER_START, LENGTH_DELIMITER, LIST_START, RECURSION_LIMIT,
};

/// Encoder output: raw bytes, or text when [`EncodeOptions::stringify`] is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Bytes(Bytes),
    Text(String),
}

impl Encoded {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Encoded::Bytes(b) => &b[..],
            Encoded::Text(s) => s.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            Encoded::Bytes(b) => b,
            Encoded::Text(s) => Bytes::from(s),
        }
    }

    /// Returns the text, if the output was stringified.
    pub fn into_text(self) -> Option<String> {
        match self {
            Encoded::Text(s) => Some(s),
            Encoded::Bytes(_) => None,
        }
    }
}

impl AsRef<[u8]> for Encoded {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encodes a value tree as canonical bencode.
///
/// The output is deterministic:
/// - Integers: `i<number>e` with no leading zeros, floats truncated toward zero
/// - Byte strings: `<length>:<data>` where the length counts bytes
/// - Lists: `l<items>e`, with absent items skipped
/// - Dictionaries: `d<key><value>...e`, keys sorted bytewise, absent values skipped
///
/// # Errors
///
/// Fails with [`ErrorKind::UnsupportedType`] for values that have no integer
/// form (non-finite or out-of-range floats) and with
/// [`ErrorKind::CircularReference`] when a container contains itself. The
/// error's path leads to the offending value.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{encode, Encodable, EncodeOptions, SharedDict};
///
/// let dict = SharedDict::new();
/// dict.insert("z", 1i64);
/// dict.insert("a", 2i64);
/// let encoded = encode(&dict.into(), &EncodeOptions::default()).unwrap();
/// assert_eq!(encoded.as_bytes(), b"d1:ai2e1:zi1ee");
///
/// let list = Encodable::from(vec![Encodable::Absent, 42.9.into()]);
/// let encoded = encode(&list, &EncodeOptions::default()).unwrap();
/// assert_eq!(encoded.as_bytes(), b"li42ee");
/// ```
pub fn encode(value: &Encodable, options: &EncodeOptions) -> Result<Encoded, EncodeError> {
    let encoded = Encoder::new(options).encode(value).inspect_err(|e| {
        debug!("Bencode encode failed ({}): {}", e.kind(), e);
    })?;
    trace!("Encoded {} bytes of bencode", encoded.as_bytes().len());
    Ok(encoded)
}

/// Encodes `value` and writes the result to `writer`.
pub fn encode_to_writer<W: Write>(
    value: &Encodable,
    options: &EncodeOptions,
    mut writer: W,
) -> Result<(), BencodeError> {
    let encoded = encode(value, options)?;
    writer.write_all(encoded.as_bytes())?;
    Ok(())
}

/// Single-use encoder state: output buffer, current path, and the set of
/// containers on the path from the root.
#[derive(Debug)]
pub struct Encoder {
    buf: BytesMut,
    path: Vec<PathSegment>,
    ancestors: HashSet<usize>,
    options: EncodeOptions,
}

impl Encoder {
    pub fn new(options: &EncodeOptions) -> Self {
        Self {
            buf: BytesMut::new(),
            path: Vec::new(),
            ancestors: HashSet::new(),
            options: options.clone(),
        }
    }

    pub fn encode(mut self, value: &Encodable) -> Result<Encoded, EncodeError> {
        self.encode_value(value)?;
        let bytes = self.buf.freeze();
        if self.options.stringify {
            let text = self.options.encoding.decode_bytes(&bytes).into_owned();
            Ok(Encoded::Text(text))
        } else {
            Ok(Encoded::Bytes(bytes))
        }
    }

    fn encode_value(&mut self, value: &Encodable) -> Result<(), EncodeError> {
        match value {
            Encodable::Bytes(b) => self.put_bytes(b),
            Encodable::List(l) => self.encode_list(l)?,
            Encodable::View(v) => self.put_bytes(&v.to_bytes()),
            Encodable::Bool(b) => self.put_integer(i64::from(*b)),
            Encodable::Integer(i) => self.put_integer(*i),
            Encodable::Float(f) => {
                let i = self.truncate(*f)?;
                self.put_integer(i);
            }
            Encodable::Text(s) => {
                let bytes = self.options.encoding.encode_str(s);
                self.put_bytes(&bytes);
            }
            Encodable::Dict(d) => self.encode_dict(d)?,
            Encodable::Absent => {}
        }
        Ok(())
    }

    fn put_integer(&mut self, i: i64) {
        self.buf.put_u8(INTEGER_START);
        self.buf.put_slice(i.to_string().as_bytes());
        self.buf.put_u8(END);
    }

    fn put_bytes(&mut self, b: &[u8]) {
        self.buf.put_slice(b.len().to_string().as_bytes());
        self.buf.put_u8(LENGTH_DELIMITER);
        self.buf.put_slice(b);
    }

    fn truncate(&self, f: f64) -> Result<i64, EncodeError> {
        let t = f.trunc();
        // -2^63 is exact as f64; i64::MAX rounds up to 2^63, which is out of range.
        if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
            Ok(t as i64)
        } else {
            Err(EncodeError::new(
                ErrorKind::UnsupportedType,
                &self.path,
                &format!("number {f} has no integer encoding"),
            ))
        }
    }

    fn enter(&mut self, id: usize) -> Result<(), EncodeError> {
        // The ancestor set holds exactly the open containers.
        if self.ancestors.len() >= RECURSION_LIMIT {
            return Err(EncodeError::new(
                ErrorKind::MaxDepthExceeded,
                &self.path,
                &format!("nesting exceeds {RECURSION_LIMIT} levels"),
            ));
        }
        if !self.ancestors.insert(id) {
            return Err(EncodeError::new(
                ErrorKind::CircularReference,
                &self.path,
                "circular reference",
            ));
        }
        Ok(())
    }

    fn leave(&mut self, id: usize) {
        self.ancestors.remove(&id);
    }

    fn encode_list(&mut self, list: &SharedList) -> Result<(), EncodeError> {
        self.enter(list.id())?;
        let items = list.read();

        self.buf.put_u8(LIST_START);
        for (i, item) in items.iter().enumerate() {
            if matches!(item, Encodable::Absent) {
                continue;
            }
            self.path.push(PathSegment::Index(i));
            self.encode_value(item)?;
            self.path.pop();
        }
        self.buf.put_u8(END);

        drop(items);
        self.leave(list.id());
        Ok(())
    }

    fn encode_dict(&mut self, dict: &SharedDict) -> Result<(), EncodeError> {
        self.enter(dict.id())?;
        let entries = dict.read();

        let encoding = self.options.encoding;
        let mut sorted: Vec<(Cow<'_, [u8]>, &String, &Encodable)> = entries
            .iter()
            .map(|(k, v)| (encoding.encode_str(k), k, v))
            .collect();
        sorted.sort_by(|a, b| text::compare(&a.0, &b.0));

        self.buf.put_u8(DICT_START);
        let mut last: Option<Cow<'_, [u8]>> = None;
        for (key_bytes, key, value) in sorted {
            if matches!(value, Encodable::Absent) {
                continue;
            }
            self.path.push(PathSegment::Key(key.clone()));
            // Distinct keys can share bytes under a single-byte encoding.
            if last.as_deref() == Some(&key_bytes[..]) {
                return Err(EncodeError::new(
                    ErrorKind::UnsupportedType,
                    &self.path,
                    &format!("key collides with another key under {encoding}"),
                ));
            }
            self.put_bytes(&key_bytes);
            self.encode_value(value)?;
            self.path.pop();
            last = Some(key_bytes);
        }
        self.buf.put_u8(END);

        drop(entries);
        self.leave(dict.id());
        Ok(())
    }
}
