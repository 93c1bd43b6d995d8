use std::cmp::Ordering;

use bytes::Bytes;
use tracing::{debug, trace};

use super::error::{DecodeError, ErrorKind};
use super::options::DecodeOptions;
use super::text;
use super::value::{Dict, Value};
use crate::constants::{
    DICT_START, END, INTEGER_START, LENGTH_DELIMITER, LIST_START, RECURSION_LIMIT,
};

/// Decodes a single bencode value from `input`.
///
/// Text input is read as its raw UTF-8 bytes. In strict mode, dictionary keys
/// must be strictly ascending and nothing may follow the value; otherwise
/// trailing bytes are ignored.
///
/// # Errors
///
/// Returns a [`DecodeError`] carrying an [`ErrorKind`] and, for structural
/// problems, the byte offset where decoding stopped.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{decode, DecodeOptions, ErrorKind, Value};
///
/// let value = decode("li1ei2ei3ee", &DecodeOptions::default()).unwrap();
/// assert_eq!(
///     value,
///     Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
/// );
///
/// let err = decode("i42ei99e", &DecodeOptions::new().strict(true)).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::TrailingData);
/// ```
pub fn decode<T>(input: &T, options: &DecodeOptions) -> Result<Value, DecodeError>
where
    T: AsRef<[u8]> + ?Sized,
{
    let input = input.as_ref();
    trace!("Decoding {} bytes of bencode", input.len());

    let mut decoder = Decoder::new(input, options)?;
    let value = decoder.decode().inspect_err(|e| {
        debug!("Bencode decode failed ({}): {}", e.kind(), e);
    })?;

    if options.strict && decoder.has_remaining() {
        let remaining = decoder.remaining().len();
        debug!("Rejecting {} trailing bytes in strict mode", remaining);
        return Err(DecodeError::trailing_data(remaining));
    }

    Ok(value)
}

/// Cursor over an immutable input buffer.
///
/// Each call to [`Decoder::decode`] reads one value starting at the current
/// position, so concatenated values can be read one after another.
///
/// ```
/// use rbencode::bencode::{DecodeOptions, Decoder, Value};
///
/// let mut decoder = Decoder::new(b"i1e4:spam", &DecodeOptions::default()).unwrap();
/// assert_eq!(decoder.decode().unwrap(), Value::Integer(1));
/// assert_eq!(decoder.position(), 3);
/// assert!(decoder.has_remaining());
/// assert_eq!(decoder.decode().unwrap().as_str(), Some("spam"));
/// assert!(!decoder.has_remaining());
/// ```
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned at the start of `input`.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::EmptyInput`] when `input` has no bytes.
    pub fn new<T>(input: &'a T, options: &DecodeOptions) -> Result<Self, DecodeError>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let data = input.as_ref();
        if data.is_empty() {
            return Err(DecodeError::empty_input());
        }
        Ok(Self {
            data,
            pos: 0,
            depth: 0,
            max_depth: options.max_depth.unwrap_or(RECURSION_LIMIT),
            options: options.clone(),
        })
    }

    /// Reads the next value.
    pub fn decode(&mut self) -> Result<Value, DecodeError> {
        self.depth = 0;
        self.decode_value()
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether unread bytes follow the cursor.
    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    /// The unconsumed tail of the input.
    pub fn remaining(&self) -> &'a [u8] {
        let data = self.data;
        &data[self.pos.min(data.len())..]
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn error(&self, kind: ErrorKind, what: &str) -> DecodeError {
        DecodeError::at(kind, self.data, self.pos, what)
    }

    fn decode_value(&mut self) -> Result<Value, DecodeError> {
        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEnd, "unexpected end of input")),
            Some(b'0'..=b'9') => self.decode_string(),
            Some(INTEGER_START) => self.read_number().map(Value::Integer),
            Some(LIST_START) => self.decode_list(),
            Some(DICT_START) => self.decode_dict(),
            Some(_) => Err(self.error(ErrorKind::InvalidFormat, "invalid type marker")),
        }
    }

    /// Reads either an `i...e` integer or a bare string length prefix.
    ///
    /// Tolerates a leading `+` and a `.` inside the digits; digits after the
    /// `.` are consumed and dropped. Leading-zero checks apply to integers
    /// only, and the `:` after a length prefix is consumed when present.
    fn read_number(&mut self) -> Result<i64, DecodeError> {
        let is_integer = self.peek() == Some(INTEGER_START);
        if is_integer {
            self.pos += 1;
        }
        if self.peek() == Some(b'+') {
            self.pos += 1;
        }
        let sign_pos = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }

        if is_integer
            && self.peek() == Some(b'0')
            && matches!(self.data.get(self.pos + 1), Some(b'0'..=b'9'))
        {
            return Err(self.error(ErrorKind::LeadingZeros, "integer has leading zeros"));
        }

        // Accumulated with its sign so that i64::MIN is reachable.
        let mut value: i64 = 0;
        let mut digits = 0usize;
        let mut truncated = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {
                    if !truncated {
                        let d = i64::from(b - b'0');
                        value = value
                            .checked_mul(10)
                            .and_then(|v| {
                                if negative {
                                    v.checked_sub(d)
                                } else {
                                    v.checked_add(d)
                                }
                            })
                            .ok_or_else(|| {
                                self.error(ErrorKind::InvalidFormat, "integer out of range")
                            })?;
                    }
                    digits += 1;
                }
                b'.' if !truncated => truncated = true,
                _ => break,
            }
            self.pos += 1;
        }

        if digits == 0 {
            if self.peek().is_none() {
                return Err(self.error(ErrorKind::UnexpectedEnd, "input ends before digits"));
            }
            return Err(self.error(ErrorKind::InvalidFormat, "expected digits"));
        }

        if is_integer {
            if self.peek() != Some(END) {
                return Err(self.error(ErrorKind::UnexpectedEnd, "unterminated integer"));
            }
            self.pos += 1;
        } else if self.peek() == Some(LENGTH_DELIMITER) {
            self.pos += 1;
        }

        if negative && value == 0 {
            return Err(DecodeError::at(
                ErrorKind::NegativeZero,
                self.data,
                sign_pos,
                "negative zero is not a valid integer",
            ));
        }

        Ok(value)
    }

    fn read_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.pos;
        let declared = self.read_number()?;
        let len = usize::try_from(declared).map_err(|_| {
            DecodeError::at(ErrorKind::InvalidFormat, self.data, start, "negative string length")
        })?;

        if let Some(max) = self.options.max_string_length {
            if len > max {
                return Err(DecodeError::at(
                    ErrorKind::MaxSizeExceeded,
                    self.data,
                    start,
                    &format!("string length {len} exceeds maximum of {max}"),
                ));
            }
        }

        let data = self.data;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                self.error(
                    ErrorKind::UnexpectedEnd,
                    &format!("string of length {len} runs past end of input"),
                )
            })?;

        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn decode_string(&mut self) -> Result<Value, DecodeError> {
        let raw = self.read_bytes()?;
        if self.options.stringify {
            let text = self.options.encoding.decode_bytes(raw).into_owned();
            Ok(Value::Text(text))
        } else {
            Ok(Value::Bytes(Bytes::copy_from_slice(raw)))
        }
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(
                ErrorKind::MaxDepthExceeded,
                &format!("nesting exceeds maximum depth of {}", self.max_depth),
            ));
        }
        Ok(())
    }

    fn decode_list(&mut self) -> Result<Value, DecodeError> {
        self.enter()?;
        self.pos += 1;

        let mut list = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error(ErrorKind::UnexpectedEnd, "unterminated list")),
                Some(END) => break,
                Some(_) => list.push(self.decode_value()?),
            }
        }

        self.pos += 1;
        self.depth -= 1;
        Ok(Value::List(list))
    }

    fn decode_dict(&mut self) -> Result<Value, DecodeError> {
        self.enter()?;
        self.pos += 1;

        let mut dict = Dict::new();
        let mut previous: Option<&'a [u8]> = None;
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ErrorKind::UnexpectedEnd, "unterminated dictionary"))
                }
                Some(END) => break,
                Some(b'0'..=b'9') => {}
                Some(_) => {
                    return Err(self.error(
                        ErrorKind::InvalidFormat,
                        "dictionary key must be a byte string",
                    ))
                }
            }

            let key_pos = self.pos;
            let key = self.read_bytes()?;
            if self.options.strict {
                if let Some(prev) = previous {
                    if text::compare(key, prev) != Ordering::Greater {
                        return Err(DecodeError::at(
                            ErrorKind::UnsortedKeys,
                            self.data,
                            key_pos,
                            "dictionary keys are not in ascending order",
                        ));
                    }
                }
            }
            previous = Some(key);

            let value = self.decode_value()?;
            dict.insert(self.options.encoding.decode_bytes(key).into_owned(), value);
        }

        self.pos += 1;
        self.depth -= 1;
        Ok(Value::Dict(dict))
    }
}
