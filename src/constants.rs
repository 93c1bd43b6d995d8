//! Codec limits.
//!
//! These guard the decoder against hostile input when the caller has not
//! configured tighter limits of its own.

// ============================================================================
// Decoder
// ============================================================================

/// Nesting ceiling applied when [`DecodeOptions`](crate::bencode::DecodeOptions)
/// sets no `max_depth`. Decoding recurses once per list or dictionary level.
pub const RECURSION_LIMIT: usize = 256;

// ============================================================================
// Wire markers
// ============================================================================

pub const INTEGER_START: u8 = b'i';
pub const LIST_START: u8 = b'l';
pub const DICT_START: u8 = b'd';
pub const END: u8 = b'e';
pub const LENGTH_DELIMITER: u8 = b':';
