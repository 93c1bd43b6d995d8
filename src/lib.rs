//! rbencode - A canonical bencode codec
//!
//! Converts between the bencode byte format used by BitTorrent and an
//! in-memory value model.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding
//! - [`constants`] - Wire markers and decoder limits

pub mod bencode;
pub mod constants;

pub use bencode::{
    decode, encode, BencodeError, DecodeError, DecodeOptions, Decoder, Encodable, EncodeError,
    EncodeOptions, Encoded, Encoding, ErrorKind, PathSegment, SharedDict, SharedList, Value,
};
