//! Integration tests: codec lifecycle, generic encode/decode primitives, composition of
//! sequential fields, and the error classification of failures.

use acnrt::{
    BitCursor, Codec, CodecError, Decoder, Encoder, ErrorCode, Outcome, Segment, DEFAULT_BUFFER_BITS,
};

fn reader(enc: &Codec) -> Codec {
    Codec::from_bytes(enc.get_bitstream_buffer()).expect("reader")
}

#[test]
fn test_zero_capacity_codec_is_refused() {
    let err = Codec::new(0).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BufferOverflow);
    assert!(Codec::from_bytes(&[]).is_err());
}

#[test]
fn test_default_codec_capacity() {
    let codec = Codec::default();
    assert_eq!(codec.max_bits(), DEFAULT_BUFFER_BITS);
    assert_eq!(codec.bits_remaining(), 8 * 1024 * 1024);
    assert!(codec.get_bitstream_buffer().is_empty());
}

#[test]
fn test_unsigned_200_in_8_bits() {
    let mut enc = Codec::new(8).expect("codec");
    let r = enc.encode_unsigned_integer(200, 8).expect("encode");
    assert_eq!(r.bits_encoded, 8);
    assert_eq!(r.encoded_data, vec![0xC8]);
    assert_eq!(enc.get_bitstream_buffer(), &[0xC8]);

    let mut dec = reader(&enc);
    let d = dec.decode_unsigned_integer(8).expect("decode");
    assert_eq!(d.value, 200);
    assert_eq!(d.bits_consumed, 8);
}

#[test]
fn test_unsigned_boundaries() {
    for n in [1u32, 7, 8, 13, 32, 63] {
        let max = (1u64 << n) - 1;
        let mut enc = Codec::new(256).expect("codec");
        enc.encode_unsigned_integer(0, n).expect("zero");
        enc.encode_unsigned_integer(max, n).expect("max");
        let overflow = enc.encode_unsigned_integer(1u64 << n, n);
        assert_eq!(overflow.error_code(), ErrorCode::InvalidValue, "width {}", n);
        assert_eq!(enc.position(), 2 * n as usize, "rejected value must not be written");

        let mut dec = reader(&enc);
        assert_eq!(dec.decode_unsigned_integer(n).expect("zero").value, 0);
        assert_eq!(dec.decode_unsigned_integer(n).expect("max").value, max);
    }
    let mut enc = Codec::new(64).expect("codec");
    enc.encode_unsigned_integer(u64::MAX, 64).expect("full width");
    assert_eq!(reader(&enc).decode_unsigned_integer(64).expect("decode").value, u64::MAX);
}

#[test]
fn test_constrained_integer_offset_encoding() {
    let mut enc = Codec::new(16).expect("codec");
    let r = enc.encode_integer(5, 0, 7, None).expect("encode");
    assert_eq!(r.bits_encoded, 3);
    assert_eq!(Segment::from_encoded(&r), Segment::new(3, 0b101));

    let bad = enc.encode_integer(8, 0, 7, None);
    assert!(!bad.success());
    assert_eq!(bad.error_code(), ErrorCode::ConstraintViolation);
    assert!(bad.error_message().is_some());
    assert_eq!(enc.position(), 3);

    let mut dec = reader(&enc);
    let d = dec.decode_integer(Some(0), Some(7), None).expect("decode");
    assert_eq!(d.value, 5);
    assert_eq!(d.bits_consumed, 3);
}

#[test]
fn test_constrained_integer_negative_range() {
    let mut enc = Codec::new(64).expect("codec");
    enc.encode_integer(-100, -100, 100, None).expect("min");
    enc.encode_integer(100, -100, 100, None).expect("max");
    enc.encode_integer(-3, -100, 100, None).expect("mid");
    assert_eq!(enc.position(), 3 * 8);

    let mut dec = reader(&enc);
    for expected in [-100, 100, -3] {
        let d = dec.decode_integer(Some(-100), Some(100), None).expect("decode");
        assert_eq!(d.value, expected);
        assert_eq!(d.bits_consumed, 8);
    }
}

#[test]
fn test_single_value_range_takes_zero_bits() {
    let mut enc = Codec::new(8).expect("codec");
    let r = enc.encode_integer(42, 42, 42, None).expect("encode");
    assert_eq!(r.bits_encoded, 0);
    assert!(r.encoded_data.is_empty());
    let mut dec = enc.copy();
    dec.rewind();
    let d = dec.decode_integer(Some(42), Some(42), None).expect("decode");
    assert_eq!((d.value, d.bits_consumed), (42, 0));
}

#[test]
fn test_full_i64_range() {
    let mut enc = Codec::new(128).expect("codec");
    enc.encode_integer(i64::MIN, i64::MIN, i64::MAX, None).expect("min");
    enc.encode_integer(i64::MAX, i64::MIN, i64::MAX, None).expect("max");
    let mut dec = reader(&enc);
    assert_eq!(dec.decode_integer(Some(i64::MIN), Some(i64::MAX), None).expect("min").value, i64::MIN);
    assert_eq!(dec.decode_integer(Some(i64::MIN), Some(i64::MAX), None).expect("max").value, i64::MAX);
}

#[test]
fn test_size_hint_mismatch_keeps_range_width() {
    let mut enc = Codec::new(32).expect("codec");
    let r = enc.encode_integer(5, 0, 7, Some(16)).expect("encode");
    assert_eq!(r.bits_encoded, 3);
    let mut dec = reader(&enc);
    assert_eq!(dec.decode_integer(Some(0), Some(7), Some(16)).expect("decode").value, 5);
}

#[test]
fn test_decode_integer_sizing_rules() {
    let mut dec = Codec::from_bytes(&[0xA0]).expect("codec");
    let d = dec.decode_integer(None, None, Some(3)).expect("size only");
    assert_eq!((d.value, d.bits_consumed), (5, 3));

    let mut dec = Codec::from_bytes(&[0xA0]).expect("codec");
    let err = dec.decode_integer(None, None, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidValue);
    assert_eq!(dec.position(), 0);

    let mut dec = Codec::from_bytes(&[0xA0]).expect("codec");
    let err = dec.decode_integer(None, Some(4), Some(3)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConstraintViolation);
}

#[test]
fn test_decode_integer_out_of_range_bits() {
    // range [0, 5] uses 3 bits; 0b111 decodes to 7
    let mut dec = Codec::from_bytes(&[0xE0]).expect("codec");
    let r = dec.decode_integer(Some(0), Some(5), None);
    assert_eq!(r.error_code(), ErrorCode::ConstraintViolation);
}

#[test]
fn test_decode_insufficient_data() {
    let mut dec = Codec::from_bytes(&[0xFF]).expect("codec");
    dec.decode_unsigned_integer(6).expect("first");
    let r = dec.decode_unsigned_integer(4);
    assert_eq!(r.error_code(), ErrorCode::InsufficientData);
    assert_eq!(dec.position(), 6);
}

#[test]
fn test_encode_past_capacity() {
    let mut enc = Codec::new(10).expect("codec");
    enc.encode_unsigned_integer(0xFF, 8).expect("fits");
    let r = enc.encode_unsigned_integer(0x7, 3);
    assert_eq!(r.error_code(), ErrorCode::InsufficientData);
    assert_eq!(enc.position(), 8);
    assert_eq!(enc.get_data_copy(), vec![0xFF]);
}

#[test]
fn test_enumerated() {
    #[derive(Debug, Clone, PartialEq)]
    enum Mode {
        Safe,
        Nominal,
        Science,
    }
    let candidates = [Mode::Safe, Mode::Nominal, Mode::Science];

    let mut enc = Codec::new(8).expect("codec");
    let r = enc.encode_enumerated(&Mode::Science, &candidates).expect("encode");
    assert_eq!(r.bits_encoded, 2);
    let mut dec = reader(&enc);
    assert_eq!(dec.decode_enumerated(&candidates).expect("decode").value, Mode::Science);

    // index 3 does not exist among 3 candidates
    let mut dec = Codec::from_bytes(&[0xC0]).expect("codec");
    let r = dec.decode_enumerated(&candidates);
    assert_eq!(r.error_code(), ErrorCode::ConstraintViolation);

    let empty: [Mode; 0] = [];
    let mut dec = Codec::from_bytes(&[0x00]).expect("codec");
    assert_eq!(dec.decode_enumerated(&empty).error_code(), ErrorCode::ConstraintViolation);
}

#[test]
fn test_null_and_boolean() {
    let mut enc = Codec::new(8).expect("codec");
    assert_eq!(enc.encode_null().expect("null").bits_encoded, 0);
    enc.encode_boolean(true).expect("true");
    enc.encode_boolean(false).expect("false");
    let mut dec = reader(&enc);
    assert_eq!(dec.decode_null().expect("null").bits_consumed, 0);
    assert!(dec.decode_boolean().expect("bool").value);
    assert!(!dec.decode_boolean().expect("bool").value);
}

#[test]
fn test_alignment_padding() {
    let mut enc = Codec::new(128).expect("codec");
    enc.encode_unsigned_integer(1, 1).expect("bit");
    assert_eq!(enc.align_to_byte().expect("byte").bits_encoded, 7);
    assert_eq!(enc.align_to_byte().expect("byte").bits_encoded, 0);
    enc.encode_unsigned_integer(1, 3).expect("bits");
    assert_eq!(enc.align_to_word().expect("word").bits_encoded, 5);
    enc.encode_unsigned_integer(1, 1).expect("bit");
    assert_eq!(enc.align_to_dword().expect("dword").bits_encoded, 15);
    assert_eq!(enc.position(), 32);

    let mut dec = reader(&enc);
    dec.decode_unsigned_integer(1).expect("bit");
    assert_eq!(dec.skip_to_byte().expect("skip").value, 7);
    dec.decode_unsigned_integer(3).expect("bits");
    assert_eq!(dec.skip_to_word().expect("skip").value, 5);
    dec.decode_unsigned_integer(1).expect("bit");
    assert_eq!(dec.skip_to_dword().expect("skip").value, 15);
    assert!(dec.is_at_end());
}

#[test]
fn test_octet_strings_without_length() {
    let mut enc = Codec::new(64).expect("codec");
    enc.encode_unsigned_integer(0b101, 3).expect("prefix");
    let r = enc.append_byte_array(&[0xDE, 0xAD]).expect("bytes");
    assert_eq!(r.encoded_data, vec![0xDE, 0xAD]);
    enc.encode_octet_string_no_length(&[0xBE]).expect("bytes");

    let mut dec = reader(&enc);
    dec.decode_unsigned_integer(3).expect("prefix");
    assert_eq!(dec.read_byte_array(2).expect("bytes").value, vec![0xDE, 0xAD]);
    let d = dec.decode_octet_string_no_length(1).expect("bytes");
    assert_eq!((d.value, d.bits_consumed), (vec![0xBE], 8));
}

#[test]
fn test_bit_strings() {
    let mut enc = Codec::new(64).expect("codec");
    let r = enc.encode_bit_string("1011001110").expect("encode");
    assert_eq!(r.bits_encoded, 10);
    let bad = enc.encode_bit_string("10z");
    assert_eq!(bad.error_code(), ErrorCode::InvalidValue);
    let mut dec = reader(&enc);
    assert_eq!(dec.decode_bit_string(10).expect("decode").value, "1011001110");
}

#[test]
fn test_sequential_composition_matches_segments() {
    let mut enc = Codec::new(64).expect("codec");
    let results = vec![
        enc.encode_integer(5, 0, 7, None).expect("a"),
        enc.encode_boolean(true).expect("b"),
        enc.encode_integer(-2, -8, 7, None).expect("c"),
        enc.encode_unsigned_integer(0x3FF, 10).expect("d"),
    ];
    let total: usize = results.iter().map(|r| r.bits_encoded).sum();
    assert_eq!(total, enc.position());

    let composed = results
        .iter()
        .map(|r| Segment::from_encoded(r).expect("segment"))
        .try_fold(Segment::empty(), Segment::concat)
        .expect("fits in 64 bits");
    assert_eq!(composed.length_in_bits as usize, total);
    let whole = reader(&enc).decode_unsigned_integer(total as u32).expect("whole").value;
    assert_eq!(whole, composed.value);

    let mut dec = reader(&enc);
    let mut consumed = 0;
    let a = dec.decode_integer(Some(0), Some(7), None).expect("a");
    let b = dec.decode_boolean().expect("b");
    let c = dec.decode_integer(Some(-8), Some(7), None).expect("c");
    let d = dec.decode_unsigned_integer(10).expect("d");
    consumed += a.bits_consumed + b.bits_consumed + c.bits_consumed + d.bits_consumed;
    assert_eq!((a.value, b.value, c.value, d.value), (5, true, -2, 0x3FF));
    assert_eq!(consumed, total);
}

#[test]
fn test_copy_is_independent() {
    let mut enc = Codec::new(32).expect("codec");
    enc.encode_unsigned_integer(0xAB, 8).expect("encode");

    let mut branch = enc.copy();
    branch.encode_unsigned_integer(0xCD, 8).expect("branch");
    assert_eq!(enc.position(), 8);
    assert_eq!(enc.get_bitstream_buffer(), &[0xAB]);
    assert_eq!(branch.get_bitstream_buffer(), &[0xAB, 0xCD]);

    let mut probe = enc.copy();
    probe.rewind();
    assert_eq!(probe.decode_unsigned_integer(8).expect("probe").value, 0xAB);
    assert_eq!(enc.position(), 8);
}

#[test]
fn test_reset_clears_content() {
    let mut enc = Codec::new(16).expect("codec");
    enc.encode_unsigned_integer(0xFF, 8).expect("encode");
    enc.reset();
    assert_eq!(enc.position(), 0);
    assert!(enc.get_bitstream_buffer().is_empty());
    enc.encode_unsigned_integer(1, 1).expect("encode");
    assert_eq!(enc.get_bitstream_buffer(), &[0x80]);
}

#[test]
fn test_set_position_bounds() {
    let mut codec = Codec::new(16).expect("codec");
    codec.set_position(16).expect("end is valid");
    let err = codec.set_position(17).unwrap_err();
    assert!(matches!(err, CodecError::InsufficientData(_)));
}

#[test]
fn test_error_messages_name_the_operation() {
    let mut enc = Codec::new(8).expect("codec");
    let err = enc.encode_integer(9, 0, 7, None).unwrap_err();
    assert!(err.to_string().contains("encode_integer"), "{}", err);
}
