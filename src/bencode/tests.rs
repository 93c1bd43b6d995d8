use bytes::Bytes;

use super::*;

fn plain() -> DecodeOptions {
    DecodeOptions::default()
}

fn strict() -> DecodeOptions {
    DecodeOptions::new().strict(true)
}

fn kind_of(input: &str, options: &DecodeOptions) -> ErrorKind {
    decode(input, options).unwrap_err().kind()
}

fn enc(value: impl Into<Encodable>) -> Vec<u8> {
    encode(&value.into(), &EncodeOptions::default())
        .unwrap()
        .into_bytes()
        .to_vec()
}

fn enc_err(value: impl Into<Encodable>) -> EncodeError {
    encode(&value.into(), &EncodeOptions::default()).unwrap_err()
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e", &plain()).unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e", &plain()).unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e", &plain()).unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_extremes() {
    assert_eq!(
        decode("i9223372036854775807e", &plain()).unwrap(),
        Value::Integer(i64::MAX)
    );
    assert_eq!(
        decode("i-9223372036854775808e", &plain()).unwrap(),
        Value::Integer(i64::MIN)
    );
    let err = decode("i9223372036854775808e", &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(err.position(), Some(19));
}

#[test]
fn test_decode_integer_invalid() {
    assert_eq!(kind_of("i03e", &plain()), ErrorKind::LeadingZeros);
    assert_eq!(kind_of("i-03e", &plain()), ErrorKind::LeadingZeros);
    assert_eq!(kind_of("i00e", &plain()), ErrorKind::LeadingZeros);
    assert_eq!(kind_of("i-0e", &plain()), ErrorKind::NegativeZero);
    assert_eq!(kind_of("ie", &plain()), ErrorKind::InvalidFormat);
    assert_eq!(kind_of("i42", &plain()), ErrorKind::UnexpectedEnd);
    assert_eq!(kind_of("i4x2e", &plain()), ErrorKind::UnexpectedEnd);
    assert_eq!(kind_of("i-e", &plain()), ErrorKind::InvalidFormat);
}

#[test]
fn test_decode_integer_truncated_input() {
    for input in ["i", "i-", "i+", "li", "d1:ai"] {
        let err = decode(input, &plain()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEnd, "input {input:?}");
        assert_eq!(err.position(), Some(input.len()));
    }
}

#[test]
fn test_decode_integer_tolerances() {
    assert_eq!(decode("i+42e", &plain()).unwrap(), Value::Integer(42));
    assert_eq!(decode("i42.9e", &plain()).unwrap(), Value::Integer(42));
    assert_eq!(decode("i-42.9e", &plain()).unwrap(), Value::Integer(-42));
    assert_eq!(decode("i0.5e", &plain()).unwrap(), Value::Integer(0));
    assert_eq!(kind_of("i-0.5e", &plain()), ErrorKind::NegativeZero);
}

#[test]
fn test_decode_error_positions() {
    let err = decode("i03e", &plain()).unwrap_err();
    assert_eq!(err.position(), Some(1));
    assert_eq!(err.message(), "integer has leading zeros at position 1 (byte '0')");

    let err = decode("i-0e", &plain()).unwrap_err();
    assert_eq!(err.position(), Some(1));

    let err = decode("l", &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEnd);
    assert_eq!(err.message(), "unterminated list at position 1");

    let err = decode(b"l\x80e".as_slice(), &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(err.message(), "invalid type marker at position 1 (byte 0x80)");
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"4:spam", &plain()).unwrap(),
        Value::Bytes(Bytes::from_static(b"spam"))
    );
    assert_eq!(
        decode(b"0:", &plain()).unwrap(),
        Value::Bytes(Bytes::from_static(b""))
    );
    assert_eq!(
        decode("4:spam", &plain().stringify(true)).unwrap(),
        Value::Text("spam".into())
    );
}

#[test]
fn test_decode_bytes_overrun() {
    let err = decode("100:abc", &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEnd);
    assert_eq!(err.position(), Some(4));
}

#[test]
fn test_decode_bytes_without_delimiter_is_lenient() {
    assert_eq!(decode("4spam", &plain()).unwrap().as_str(), Some("spam"));
}

#[test]
fn test_decode_max_string_length() {
    let options = plain().max_string_length(3);
    assert_eq!(decode("3:abc", &options).unwrap().as_str(), Some("abc"));
    let err = decode("4:spam", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxSizeExceeded);
    assert_eq!(err.position(), Some(0));
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spami42ee", &plain()).unwrap();
    match result {
        Value::List(l) => {
            assert_eq!(l.len(), 2);
            assert_eq!(l[0], Value::Bytes(Bytes::from_static(b"spam")));
            assert_eq!(l[1], Value::Integer(42));
        }
        _ => panic!("expected list"),
    }
}

#[test]
fn test_decode_max_depth() {
    let options = plain().max_depth(2);
    assert!(decode("llee", &options).is_ok());
    let err = decode("llleee", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxDepthExceeded);
    assert_eq!(err.position(), Some(2));
    assert_eq!(kind_of("d1:ald1:bi1eeee", &options), ErrorKind::MaxDepthExceeded);
    assert_eq!(kind_of("le", &plain().max_depth(0)), ErrorKind::MaxDepthExceeded);
}

#[test]
fn test_decode_recursion_limit() {
    let depth = crate::constants::RECURSION_LIMIT + 1;
    let input = format!("{}{}", "l".repeat(depth), "e".repeat(depth));
    assert_eq!(kind_of(&input, &plain()), ErrorKind::MaxDepthExceeded);
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse", &plain()).unwrap();
    match result {
        Value::Dict(d) => {
            assert_eq!(d.len(), 2);
            assert_eq!(
                d.get("cow"),
                Some(&Value::Bytes(Bytes::from_static(b"moo")))
            );
        }
        _ => panic!("expected dict"),
    }
}

#[test]
fn test_decode_dict_preserves_input_order() {
    let value = decode("d1:bi1e1:ai2ee", &plain()).unwrap();
    let keys: Vec<&str> = value.as_dict().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["b", "a"]);
}

#[test]
fn test_decode_dict_duplicate_key_keeps_last_value() {
    let value = decode("d1:ai1e1:bi2e1:ai3ee", &plain()).unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get_index(0), Some((&"a".to_string(), &Value::Integer(3))));
}

#[test]
fn test_decode_dict_invalid_key() {
    assert_eq!(kind_of("di1ei2ee", &plain()), ErrorKind::InvalidFormat);
    assert_eq!(kind_of("d", &plain()), ErrorKind::UnexpectedEnd);
    assert_eq!(kind_of("d3:foo", &plain()), ErrorKind::UnexpectedEnd);
    assert_eq!(kind_of("d3:fooe", &plain()), ErrorKind::InvalidFormat);
}

#[test]
fn test_strict_key_order() {
    assert!(decode("d1:ai1e1:bi2ee", &strict()).is_ok());
    let err = decode("d1:bi1e1:ai2ee", &strict()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsortedKeys);
    assert_eq!(err.position(), Some(7));
    assert_eq!(kind_of("d1:ai1e1:ai2ee", &strict()), ErrorKind::UnsortedKeys);
    // Bytewise order: uppercase sorts before lowercase, prefixes first.
    assert!(decode("d1:Zi1e1:ai2e2:aai3ee", &strict()).is_ok());
}

#[test]
fn test_trailing_data() {
    let err = decode("i42ei99e", &strict()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrailingData);
    assert_eq!(err.position(), None);
    assert_eq!(decode("i42ei99e", &plain()).unwrap(), Value::Integer(42));
}

#[test]
fn test_empty_input() {
    let err = decode("", &plain()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert_eq!(err.position(), None);
    assert!(Decoder::new(b"".as_slice(), &plain()).is_err());
}

#[test]
fn test_decoder_reads_consecutive_values() {
    let mut decoder = Decoder::new("i1eli2ee3:abc", &plain()).unwrap();
    assert_eq!(decoder.decode().unwrap(), Value::Integer(1));
    assert_eq!(decoder.position(), 3);
    assert_eq!(decoder.remaining(), b"li2ee3:abc");
    assert_eq!(
        decoder.decode().unwrap(),
        Value::List(vec![Value::Integer(2)])
    );
    assert_eq!(decoder.decode().unwrap().as_str(), Some("abc"));
    assert!(!decoder.has_remaining());
    assert_eq!(decoder.decode().unwrap_err().kind(), ErrorKind::UnexpectedEnd);
}

#[test]
fn test_decode_stringify_encodings() {
    let input: &[u8] = b"d3:key2:\xe9\xffe";
    let latin1 = plain().stringify(true).encoding(Encoding::Latin1);
    assert_eq!(
        decode(input, &latin1).unwrap().get("key"),
        Some(&Value::Text("\u{e9}\u{ff}".into()))
    );
    let utf8 = plain().stringify(true);
    assert_eq!(
        decode(input, &utf8).unwrap().get("key"),
        Some(&Value::Text("\u{fffd}\u{fffd}".into()))
    );
    let ascii = plain().stringify(true).encoding(Encoding::Ascii);
    assert_eq!(
        decode(input, &ascii).unwrap().get("key"),
        Some(&Value::Text("i\u{7f}".into()))
    );
}

#[test]
fn test_encode_integer() {
    assert_eq!(enc(42i64), b"i42e");
    assert_eq!(enc(-42i64), b"i-42e");
    assert_eq!(enc(0i64), b"i0e");
    assert_eq!(enc(i64::MIN), b"i-9223372036854775808e");
}

#[test]
fn test_encode_float_truncates() {
    assert_eq!(enc(42.9), enc(42i64));
    assert_eq!(enc(-42.9), enc(-42i64));
    assert_eq!(enc(-0.0), b"i0e");
    assert_eq!(enc(-0.5), b"i0e");
}

#[test]
fn test_encode_unrepresentable_float() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e19, -1e19] {
        let err = enc_err(f);
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert!(err.path().is_empty());
    }
}

#[test]
fn test_encode_bool() {
    assert_eq!(enc(true), b"i1e");
    assert_eq!(enc(false), b"i0e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(enc(Bytes::from_static(b"spam")), b"4:spam");
    assert_eq!(enc(vec![0u8, 0xff]), b"2:\x00\xff");
    assert_eq!(enc(""), b"0:");
}

#[test]
fn test_encode_text_uses_byte_length() {
    assert_eq!(enc("héllo"), "6:héllo".as_bytes());
    let latin1 = EncodeOptions::new().encoding(Encoding::Latin1);
    let encoded = encode(&"héllo".into(), &latin1).unwrap();
    assert_eq!(encoded.as_bytes(), b"5:h\xe9llo");
}

#[test]
fn test_encode_view() {
    assert_eq!(enc(View::U16(vec![1, 0x0203])), b"4:\x01\x00\x03\x02");
    assert_eq!(enc(View::I8(vec![-1])), b"1:\xff");
    assert_eq!(enc(View::F32(vec![])), b"0:");
}

#[test]
fn test_encode_list() {
    let list: SharedList = vec![Encodable::from("spam"), 42i64.into()].into();
    assert_eq!(enc(list), b"l4:spami42ee");
}

#[test]
fn test_encode_skips_absent() {
    let list = vec![Encodable::Absent, Encodable::from(None::<i64>), 42i64.into()];
    assert_eq!(enc(list), b"li42ee");

    let dict = SharedDict::new();
    dict.insert("gone", Encodable::Absent);
    dict.insert("kept", 1i64);
    assert_eq!(enc(dict), b"d4:kepti1ee");

    assert_eq!(enc(Encodable::Absent), b"");
}

#[test]
fn test_encode_dict() {
    let dict = SharedDict::new();
    dict.insert("cow", "moo");
    assert_eq!(enc(dict), b"d3:cow3:mooe");
}

#[test]
fn test_encode_dict_sorts_keys() {
    let dict = SharedDict::new();
    dict.insert("z", 1i64);
    dict.insert("a", 2i64);
    assert_eq!(enc(dict), b"d1:ai2e1:zi1ee");

    let dict: SharedDict = [("b", 1i64), ("B", 2), ("ab", 3), ("a", 4)].into_iter().collect();
    assert_eq!(enc(dict), b"d1:Bi2e1:ai4e2:abi3e1:bi1ee");
}

#[test]
fn test_encode_dict_key_collision() {
    let dict: SharedDict = [("\0", 1i64), ("\u{100}", 2)].into_iter().collect();
    assert_eq!(enc(dict.clone()), "d1:\0i1e2:\u{100}i2ee".as_bytes());

    let options = EncodeOptions::new().encoding(Encoding::Latin1);
    let err = encode(&dict.into(), &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(err.path(), [PathSegment::Key("\u{100}".into())]);

    let dict: SharedDict = [("\0", Encodable::Absent), ("\u{100}", 2i64.into())]
        .into_iter()
        .collect();
    let encoded = encode(&dict.into(), &options).unwrap();
    assert!(decode(encoded.as_bytes(), &strict()).is_ok());
}

#[test]
fn test_encode_depth_limit() {
    let nest = |levels: usize| {
        let mut value = Encodable::from(SharedList::new());
        for _ in 1..levels {
            value = vec![value].into();
        }
        value
    };
    let limit = crate::constants::RECURSION_LIMIT;
    assert!(encode(&nest(limit), &EncodeOptions::default()).is_ok());

    let err = encode(&nest(limit + 1), &EncodeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxDepthExceeded);
    assert_eq!(err.path().len(), limit);
}

#[test]
fn test_encode_stringify() {
    let options = EncodeOptions::new().stringify(true);
    let encoded = encode(&vec![Encodable::from(1i64)].into(), &options).unwrap();
    assert_eq!(encoded, Encoded::Text("li1ee".into()));

    let options = options.encoding(Encoding::Latin1);
    let encoded = encode(&vec![0xe9u8].into(), &options).unwrap();
    assert_eq!(encoded.into_text().as_deref(), Some("1:\u{e9}"));
}

#[test]
fn test_encode_direct_cycle() {
    let list = SharedList::new();
    list.push(1i64);
    list.push(list.clone());
    let err = enc_err(list);
    assert_eq!(err.kind(), ErrorKind::CircularReference);
    assert_eq!(err.path(), [PathSegment::Index(1)]);
}

#[test]
fn test_encode_nested_cycle() {
    let outer = SharedDict::new();
    let inner = SharedList::new();
    inner.push(outer.clone());
    outer.insert("child", inner);
    let err = enc_err(outer);
    assert_eq!(err.kind(), ErrorKind::CircularReference);
    assert_eq!(
        err.path(),
        [PathSegment::Key("child".into()), PathSegment::Index(0)]
    );
    assert_eq!(err.message(), "circular reference at path [\"child\", 0]");
}

#[test]
fn test_encode_shared_subtree() {
    let shared: SharedList = [1i64, 2].into_iter().collect();
    let root = SharedDict::new();
    root.insert("x", shared.clone());
    root.insert("y", shared);
    assert_eq!(enc(root), b"d1:xli1ei2ee1:yli1ei2eee");
}

#[test]
fn test_encode_error_path() {
    let inner = SharedDict::new();
    inner.insert("bad", f64::NAN);
    let root = vec![Encodable::Absent, Encodable::from("ok"), inner.into()];
    let err = enc_err(root);
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(
        err.path(),
        [PathSegment::Index(2), PathSegment::Key("bad".into())]
    );
}

#[test]
fn test_encode_to_writer() {
    let mut out = Vec::new();
    encode_to_writer(&42i64.into(), &EncodeOptions::default(), &mut out).unwrap();
    assert_eq!(out, b"i42e");

    let err = encode_to_writer(&f64::NAN.into(), &EncodeOptions::default(), &mut out)
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::UnsupportedType));
}

#[test]
fn test_roundtrip() {
    // Keys must be sorted lexicographically for bencode roundtrip
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original, &strict()).unwrap();
    assert_eq!(enc(decoded), original);
}

#[test]
fn test_nested_structures() {
    let data = b"d4:listl4:spami42eee";
    let decoded = decode(data, &plain()).unwrap();
    assert_eq!(enc(decoded), data);
}

#[test]
fn test_reencode_canonicalizes() {
    let decoded = decode("d1:bi1e1:ai2ee", &plain()).unwrap();
    assert_eq!(enc(decoded), b"d1:ai2e1:bi1ee");
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());

    let value = Value::Bytes(Bytes::from_static(b"test"));
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::Bytes(Bytes::from_static(b"\xff"));
    assert_eq!(value.as_str(), None);

    let value = Value::Text("test".into());
    assert_eq!(value.as_bytes(), Some(b"test".as_slice()));

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
    assert!(value.into_dict().is_none());
}

#[test]
fn test_error_kind_codes() {
    assert_eq!(ErrorKind::EmptyInput.code(), "EMPTY_INPUT");
    assert_eq!(ErrorKind::MaxDepthExceeded.to_string(), "MAX_DEPTH_EXCEEDED");
    assert_eq!(ErrorKind::CircularReference.code(), "CIRCULAR_REFERENCE");
}
