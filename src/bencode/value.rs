use bytes::Bytes;
use indexmap::IndexMap;

/// Dictionary produced by the decoder. Iteration follows input order.
pub type Dict = IndexMap<String, Value>;

/// A decoded bencode value.
///
/// Byte strings come back as [`Value::Bytes`] unless the decoder was asked to
/// stringify them, in which case they are [`Value::Text`].
///
/// # Examples
///
/// ```
/// use rbencode::bencode::Value;
///
/// let int: Value = 42i64.into();
/// let string: Value = "hello".into();
///
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A raw byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// A byte string materialized as text.
    Text(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary keyed by text, in input order.
    Dict(Dict),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    ///
    /// ```
    /// use rbencode::bencode::Value;
    ///
    /// let value = Value::string("hello");
    /// assert_eq!(value.as_bytes(), Some(b"hello".as_slice()));
    /// ```
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the content of a byte string, stringified or not.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(&b[..]),
            Value::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Returns a byte string as text.
    ///
    /// Raw bytes are only returned when they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l.as_slice()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// ```
    /// use rbencode::bencode::{decode, DecodeOptions};
    ///
    /// let value = decode(b"d3:foo3:bare", &DecodeOptions::default()).unwrap();
    /// assert_eq!(value.get("foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get("missing"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}
