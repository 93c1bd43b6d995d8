//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent. It has
//! four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! The decoder produces [`Value`] trees. The encoder accepts the wider
//! [`Encodable`] model and always emits canonical output, with dictionary
//! keys sorted bytewise, so equal trees encode to identical bytes.
//!
//! # Examples
//!
//! ## Decoding
//!
//! ```
//! use rbencode::bencode::{decode, DecodeOptions, Value};
//!
//! let value = decode(b"4:spam", &DecodeOptions::default()).unwrap();
//! assert_eq!(value.as_bytes(), Some(b"spam".as_slice()));
//!
//! let options = DecodeOptions::new().stringify(true);
//! let value = decode("d3:fooi42ee", &options).unwrap();
//! assert_eq!(value.get("foo"), Some(&Value::Integer(42)));
//! ```
//!
//! ## Encoding
//!
//! ```
//! use rbencode::bencode::{encode, Encodable, EncodeOptions, SharedDict, SharedList};
//!
//! let info = SharedDict::new();
//! info.insert("name", "example.txt");
//! info.insert("length", 1024i64);
//! info.insert("piece length", 16384i64);
//!
//! let torrent = SharedDict::new();
//! torrent.insert("info", info);
//! torrent.insert("announce", "http://tracker.example.com/announce");
//!
//! let encoded = encode(&torrent.into(), &EncodeOptions::default()).unwrap();
//! assert!(encoded.as_bytes().starts_with(b"d8:announce"));
//!
//! let list: SharedList = [1i64, 2, 3].into_iter().collect();
//! let options = EncodeOptions::new().stringify(true);
//! let encoded = encode(&Encodable::List(list), &options).unwrap();
//! assert_eq!(encoded.into_text().as_deref(), Some("li1ei2ei3ee"));
//! ```
//!
//! # Error Handling
//!
//! Every failure carries an [`ErrorKind`]. Decode errors add the byte
//! position where decoding stopped; encode errors add the path from the root
//! to the offending value.
//!
//! ```
//! use rbencode::bencode::{decode, DecodeOptions, ErrorKind};
//!
//! let err = decode("i03e", &DecodeOptions::default()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::LeadingZeros);
//! assert_eq!(err.position(), Some(1));
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod item;
mod options;
mod text;
mod value;

pub use decode::{decode, Decoder};
pub use encode::{encode, encode_to_writer, Encoded, Encoder};
pub use error::{BencodeError, DecodeError, EncodeError, ErrorKind, PathSegment};
pub use item::{Encodable, SharedDict, SharedList, View};
pub use options::{DecodeOptions, EncodeOptions};
pub use text::{byte_len, compare, Encoding, ParseEncodingError};
pub use value::{Dict, Value};

#[cfg(test)]
mod tests;
