//! ACN encode catalogue: fixed and variable size integers (unsigned, two's complement,
//! BCD), IEEE-754 reals in both byte orders, length fields and string layouts.
//!
//! Every operation validates its input before writing, so a rejected value never
//! reaches the buffer. Byte order only affects how bytes are sequenced; bits inside a
//! byte are always MSB first.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::codec::{encode_with, BitCursor, BitSink};
use crate::encoder::Encoder;
use crate::error::{CodecError, EncodeResult};
use crate::helpers::{
    bytes_needed_signed, bytes_needed_unsigned, decimal_digits, fits_signed, fits_unsigned,
    index_bits, to_twos_complement, IA5_ALPHABET,
};

/// Nibble marking the end of a null-terminated BCD number.
pub const BCD_TERMINATOR: u8 = 0xF;

/// Encode side of the ACN layer. Implemented for every [`BitSink`].
pub trait AcnEncoder: Encoder {
    fn enc_int_positive_integer_const_size(&mut self, value: u64, size_in_bits: u32) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size", |s| {
            put_unsigned(s, value, size_in_bits)
        })
    }

    fn enc_int_positive_integer_const_size_8(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_8", |s| put_unsigned(s, value, 8))
    }

    fn enc_int_positive_integer_const_size_big_endian_16(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_big_endian_16", |s| {
            put_ordered::<BigEndian, _>(s, value, 2)
        })
    }

    fn enc_int_positive_integer_const_size_big_endian_32(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_big_endian_32", |s| {
            put_ordered::<BigEndian, _>(s, value, 4)
        })
    }

    fn enc_int_positive_integer_const_size_big_endian_64(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_big_endian_64", |s| {
            put_ordered::<BigEndian, _>(s, value, 8)
        })
    }

    fn enc_int_positive_integer_const_size_little_endian_16(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_little_endian_16", |s| {
            put_ordered::<LittleEndian, _>(s, value, 2)
        })
    }

    fn enc_int_positive_integer_const_size_little_endian_32(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_little_endian_32", |s| {
            put_ordered::<LittleEndian, _>(s, value, 4)
        })
    }

    fn enc_int_positive_integer_const_size_little_endian_64(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_const_size_little_endian_64", |s| {
            put_ordered::<LittleEndian, _>(s, value, 8)
        })
    }

    /// One length byte (byte count) followed by the minimal big-endian bytes of `value`.
    fn enc_int_positive_integer_var_size_length_embedded(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_positive_integer_var_size_length_embedded", |s| {
            let nbytes = bytes_needed_unsigned(value);
            s.ensure_room(8 + nbytes * 8)?;
            s.write_bits(nbytes as u64, 8)?;
            put_ordered::<BigEndian, _>(s, value, nbytes)
        })
    }

    /// `value` in `size_in_bits`-bit two's complement, range `[-2^(n-1), 2^(n-1) - 1]`.
    fn enc_int_twos_complement_const_size(&mut self, value: i64, size_in_bits: u32) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size", |s| {
            put_signed(s, value, size_in_bits)
        })
    }

    fn enc_int_twos_complement_const_size_8(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_8", |s| put_signed(s, value, 8))
    }

    fn enc_int_twos_complement_const_size_big_endian_16(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_big_endian_16", |s| {
            put_signed_ordered::<BigEndian, _>(s, value, 2)
        })
    }

    fn enc_int_twos_complement_const_size_big_endian_32(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_big_endian_32", |s| {
            put_signed_ordered::<BigEndian, _>(s, value, 4)
        })
    }

    fn enc_int_twos_complement_const_size_big_endian_64(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_big_endian_64", |s| {
            put_signed_ordered::<BigEndian, _>(s, value, 8)
        })
    }

    fn enc_int_twos_complement_const_size_little_endian_16(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_little_endian_16", |s| {
            put_signed_ordered::<LittleEndian, _>(s, value, 2)
        })
    }

    fn enc_int_twos_complement_const_size_little_endian_32(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_little_endian_32", |s| {
            put_signed_ordered::<LittleEndian, _>(s, value, 4)
        })
    }

    fn enc_int_twos_complement_const_size_little_endian_64(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_const_size_little_endian_64", |s| {
            put_signed_ordered::<LittleEndian, _>(s, value, 8)
        })
    }

    /// One length byte followed by the fewest big-endian bytes whose two's-complement
    /// range contains `value` (0 and -1 take one byte).
    fn enc_int_twos_complement_var_size_length_embedded(&mut self, value: i64) -> EncodeResult {
        encode_with(self, "enc_int_twos_complement_var_size_length_embedded", |s| {
            let nbytes = bytes_needed_signed(value);
            s.ensure_room(8 + nbytes * 8)?;
            s.write_bits(nbytes as u64, 8)?;
            put_ordered::<BigEndian, _>(s, to_twos_complement(value, nbytes as u32 * 8), nbytes)
        })
    }

    /// Exactly `num_nibbles` BCD digits, zero padded on the left.
    fn enc_int_bcd_const_size(&mut self, value: u64, num_nibbles: usize) -> EncodeResult {
        encode_with(self, "enc_int_bcd_const_size", |s| {
            let digits = decimal_digits(value);
            if digits.len() > num_nibbles {
                return Err(CodecError::InvalidValue(format!(
                    "{} needs {} digits, field holds {}",
                    value,
                    digits.len(),
                    num_nibbles
                )));
            }
            s.ensure_room(num_nibbles.saturating_mul(4))?;
            for _ in digits.len()..num_nibbles {
                s.write_bits(0, 4)?;
            }
            put_digits(s, &digits)
        })
    }

    /// 8-bit digit count followed by the digits.
    fn enc_int_bcd_var_size_length_embedded(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_bcd_var_size_length_embedded", |s| {
            let digits = decimal_digits(value);
            s.ensure_room(8 + digits.len() * 4)?;
            s.write_bits(digits.len() as u64, 8)?;
            put_digits(s, &digits)
        })
    }

    /// Digits followed by a `0xF` nibble.
    fn enc_int_bcd_var_size_null_terminated(&mut self, value: u64) -> EncodeResult {
        encode_with(self, "enc_int_bcd_var_size_null_terminated", |s| {
            let digits = decimal_digits(value);
            s.ensure_room(digits.len() * 4 + 4)?;
            put_digits(s, &digits)?;
            s.write_bits(BCD_TERMINATOR as u64, 4)
        })
    }

    fn enc_uint_ascii_const_size(&mut self, _value: u64, _num_chars: usize) -> EncodeResult {
        encode_with(self, "enc_uint_ascii_const_size", |_| Err(unsupported()))
    }

    fn enc_sint_ascii_const_size(&mut self, _value: i64, _num_chars: usize) -> EncodeResult {
        encode_with(self, "enc_sint_ascii_const_size", |_| Err(unsupported()))
    }

    fn enc_uint_ascii_var_size_length_embedded(&mut self, _value: u64) -> EncodeResult {
        encode_with(self, "enc_uint_ascii_var_size_length_embedded", |_| Err(unsupported()))
    }

    fn enc_sint_ascii_var_size_length_embedded(&mut self, _value: i64) -> EncodeResult {
        encode_with(self, "enc_sint_ascii_var_size_length_embedded", |_| Err(unsupported()))
    }

    fn enc_uint_ascii_var_size_null_terminated(&mut self, _value: u64, _terminator: &[u8]) -> EncodeResult {
        encode_with(self, "enc_uint_ascii_var_size_null_terminated", |_| Err(unsupported()))
    }

    fn enc_sint_ascii_var_size_null_terminated(&mut self, _value: i64, _terminator: &[u8]) -> EncodeResult {
        encode_with(self, "enc_sint_ascii_var_size_null_terminated", |_| Err(unsupported()))
    }

    fn enc_real_ieee754_32_big_endian(&mut self, value: f32) -> EncodeResult {
        encode_with(self, "enc_real_ieee754_32_big_endian", |s| {
            let mut buf = [0u8; 4];
            BigEndian::write_f32(&mut buf, value);
            s.write_bytes(&buf)
        })
    }

    fn enc_real_ieee754_32_little_endian(&mut self, value: f32) -> EncodeResult {
        encode_with(self, "enc_real_ieee754_32_little_endian", |s| {
            let mut buf = [0u8; 4];
            LittleEndian::write_f32(&mut buf, value);
            s.write_bytes(&buf)
        })
    }

    fn enc_real_ieee754_64_big_endian(&mut self, value: f64) -> EncodeResult {
        encode_with(self, "enc_real_ieee754_64_big_endian", |s| {
            let mut buf = [0u8; 8];
            BigEndian::write_f64(&mut buf, value);
            s.write_bytes(&buf)
        })
    }

    fn enc_real_ieee754_64_little_endian(&mut self, value: f64) -> EncodeResult {
        encode_with(self, "enc_real_ieee754_64_little_endian", |s| {
            let mut buf = [0u8; 8];
            LittleEndian::write_f64(&mut buf, value);
            s.write_bytes(&buf)
        })
    }

    /// Length determinant: plain unsigned field of any width up to 64 bits.
    fn enc_length(&mut self, length: u64, length_size_in_bits: u32) -> EncodeResult {
        encode_with(self, "enc_length", |s| {
            if length_size_in_bits > 64 || !fits_unsigned(length, length_size_in_bits) {
                return Err(CodecError::InvalidValue(format!(
                    "length {} does not fit in {} bits",
                    length, length_size_in_bits
                )));
            }
            s.write_bits(length, length_size_in_bits)
        })
    }

    /// Exactly `size` 8-bit characters.
    fn enc_string_ascii_fixed_size(&mut self, size: usize, value: &str) -> EncodeResult {
        encode_with(self, "enc_string_ascii_fixed_size", |s| {
            let bytes = ascii_bytes(value)?;
            if bytes.len() != size {
                return Err(CodecError::ConstraintViolation(format!(
                    "length {} differs from fixed size {}",
                    bytes.len(),
                    size
                )));
            }
            s.write_bytes(bytes)
        })
    }

    /// Up to `max_len` characters followed by `null_character`; longer input is truncated.
    /// A value that would contain the terminator is `InvalidValue`.
    fn enc_string_ascii_null_terminated(&mut self, max_len: usize, null_character: u8, value: &str) -> EncodeResult {
        encode_with(self, "enc_string_ascii_null_terminated", |s| {
            put_null_terminated(s, max_len, &[null_character], value)
        })
    }

    /// Like [`enc_string_ascii_null_terminated`](AcnEncoder::enc_string_ascii_null_terminated)
    /// with a multi-byte terminator sequence.
    fn enc_string_ascii_null_terminated_mult(&mut self, max_len: usize, terminator: &[u8], value: &str) -> EncodeResult {
        encode_with(self, "enc_string_ascii_null_terminated_mult", |s| {
            put_null_terminated(s, max_len, terminator, value)
        })
    }

    /// Characters only; the length travels in another field.
    fn enc_string_ascii_external_field_determinant(&mut self, max_len: usize, value: &str) -> EncodeResult {
        encode_with(self, "enc_string_ascii_external_field_determinant", |s| {
            let bytes = ascii_bytes(value)?;
            check_len(bytes.len(), 0, max_len)?;
            s.write_bytes(bytes)
        })
    }

    /// Constrained length in `[min_len, max_len]` followed by the characters.
    fn enc_string_ascii_internal_field_determinant(&mut self, max_len: usize, min_len: usize, value: &str) -> EncodeResult {
        encode_with(self, "enc_string_ascii_internal_field_determinant", |s| {
            let bytes = ascii_bytes(value)?;
            check_len(bytes.len(), min_len, max_len)?;
            s.encode_integer(bytes.len() as i64, min_len as i64, max_len as i64, None)?;
            s.write_bytes(bytes)
        })
    }

    /// Exactly `size` characters, each written as its index in `alphabet`.
    fn enc_string_char_index_fixed_size(&mut self, size: usize, alphabet: &[u8], value: &str) -> EncodeResult {
        encode_with(self, "enc_string_char_index_fixed_size", |s| {
            let bytes = value.as_bytes();
            if bytes.len() != size {
                return Err(CodecError::ConstraintViolation(format!(
                    "length {} differs from fixed size {}",
                    bytes.len(),
                    size
                )));
            }
            let indexes = char_indexes(alphabet, bytes)?;
            put_char_indexes(s, alphabet, &indexes)
        })
    }

    fn enc_string_char_index_external_field_determinant(&mut self, max_len: usize, alphabet: &[u8], value: &str) -> EncodeResult {
        encode_with(self, "enc_string_char_index_external_field_determinant", |s| {
            let bytes = value.as_bytes();
            check_len(bytes.len(), 0, max_len)?;
            let indexes = char_indexes(alphabet, bytes)?;
            put_char_indexes(s, alphabet, &indexes)
        })
    }

    fn enc_string_char_index_internal_field_determinant(
        &mut self,
        max_len: usize,
        alphabet: &[u8],
        min_len: usize,
        value: &str,
    ) -> EncodeResult {
        encode_with(self, "enc_string_char_index_internal_field_determinant", |s| {
            let bytes = value.as_bytes();
            check_len(bytes.len(), min_len, max_len)?;
            let indexes = char_indexes(alphabet, bytes)?;
            s.encode_integer(bytes.len() as i64, min_len as i64, max_len as i64, None)?;
            put_char_indexes(s, alphabet, &indexes)
        })
    }

    fn enc_ia5_string_char_index_external_field_determinant(&mut self, max_len: usize, value: &str) -> EncodeResult {
        encode_with(self, "enc_ia5_string_char_index_external_field_determinant", |s| {
            let bytes = value.as_bytes();
            check_len(bytes.len(), 0, max_len)?;
            let indexes = char_indexes(&IA5_ALPHABET, bytes)?;
            put_char_indexes(s, &IA5_ALPHABET, &indexes)
        })
    }

    fn enc_ia5_string_char_index_internal_field_determinant(&mut self, max_len: usize, min_len: usize, value: &str) -> EncodeResult {
        encode_with(self, "enc_ia5_string_char_index_internal_field_determinant", |s| {
            let bytes = value.as_bytes();
            check_len(bytes.len(), min_len, max_len)?;
            let indexes = char_indexes(&IA5_ALPHABET, bytes)?;
            s.encode_integer(bytes.len() as i64, min_len as i64, max_len as i64, None)?;
            put_char_indexes(s, &IA5_ALPHABET, &indexes)
        })
    }
}

impl<S: BitSink + ?Sized> AcnEncoder for S {}

fn unsupported() -> CodecError {
    CodecError::UnsupportedOperation("ASCII integer encodings are not implemented".to_string())
}

fn put_unsigned<S: BitSink + ?Sized>(s: &mut S, value: u64, bits: u32) -> Result<(), CodecError> {
    if bits == 0 || bits > 64 {
        return Err(CodecError::InvalidValue(format!("field width {} not in 1..=64", bits)));
    }
    if !fits_unsigned(value, bits) {
        return Err(CodecError::InvalidValue(format!("{} does not fit in {} bits", value, bits)));
    }
    s.write_bits(value, bits)
}

fn put_signed<S: BitSink + ?Sized>(s: &mut S, value: i64, bits: u32) -> Result<(), CodecError> {
    if bits == 0 || bits > 64 {
        return Err(CodecError::InvalidValue(format!("field width {} not in 1..=64", bits)));
    }
    if !fits_signed(value, bits) {
        return Err(CodecError::InvalidValue(format!(
            "{} outside the {}-bit two's complement range",
            value, bits
        )));
    }
    s.write_bits(to_twos_complement(value, bits), bits)
}

/// `nbytes` bytes of `value` sequenced in byte order `B`.
fn put_ordered<B: ByteOrder, S: BitSink + ?Sized>(s: &mut S, value: u64, nbytes: usize) -> Result<(), CodecError> {
    if !fits_unsigned(value, nbytes as u32 * 8) {
        return Err(CodecError::InvalidValue(format!("{} does not fit in {} bytes", value, nbytes)));
    }
    let mut buf = [0u8; 8];
    B::write_uint(&mut buf[..nbytes], value, nbytes);
    s.write_bytes(&buf[..nbytes])
}

fn put_signed_ordered<B: ByteOrder, S: BitSink + ?Sized>(s: &mut S, value: i64, nbytes: usize) -> Result<(), CodecError> {
    let bits = nbytes as u32 * 8;
    if !fits_signed(value, bits) {
        return Err(CodecError::InvalidValue(format!(
            "{} outside the {}-bit two's complement range",
            value, bits
        )));
    }
    put_ordered::<B, S>(s, to_twos_complement(value, bits), nbytes)
}

fn put_digits<S: BitSink + ?Sized>(s: &mut S, digits: &[u8]) -> Result<(), CodecError> {
    for &d in digits {
        s.write_bits(d as u64, 4)?;
    }
    Ok(())
}

fn ascii_bytes(value: &str) -> Result<&[u8], CodecError> {
    if !value.is_ascii() {
        return Err(CodecError::InvalidValue(format!("{:?} is not ASCII", value)));
    }
    Ok(value.as_bytes())
}

fn check_len(len: usize, min_len: usize, max_len: usize) -> Result<(), CodecError> {
    if len < min_len || len > max_len {
        return Err(CodecError::ConstraintViolation(format!(
            "length {} outside [{}, {}]",
            len, min_len, max_len
        )));
    }
    Ok(())
}

fn put_null_terminated<S: BitSink + ?Sized>(
    s: &mut S,
    max_len: usize,
    terminator: &[u8],
    value: &str,
) -> Result<(), CodecError> {
    if terminator.is_empty() {
        return Err(CodecError::InvalidValue("empty terminator".to_string()));
    }
    let bytes = ascii_bytes(value)?;
    let payload = &bytes[..bytes.len().min(max_len)];
    let mut framed = payload.to_vec();
    framed.extend_from_slice(terminator);
    if framed.windows(terminator.len()).position(|w| w == terminator) != Some(payload.len()) {
        return Err(CodecError::InvalidValue(format!(
            "{:?} would end early at terminator {:?}",
            value, terminator
        )));
    }
    s.ensure_room((payload.len() + terminator.len()) * 8)?;
    s.write_bytes(payload)?;
    s.write_bytes(terminator)
}

fn char_indexes(alphabet: &[u8], bytes: &[u8]) -> Result<Vec<u64>, CodecError> {
    bytes
        .iter()
        .map(|&c| {
            alphabet
                .iter()
                .position(|&a| a == c)
                .map(|i| i as u64)
                .ok_or_else(|| CodecError::InvalidValue(format!("character {:?} not in alphabet", c as char)))
        })
        .collect()
}

fn put_char_indexes<S: BitSink + ?Sized>(s: &mut S, alphabet: &[u8], indexes: &[u64]) -> Result<(), CodecError> {
    let bits = index_bits(alphabet.len());
    s.ensure_room(indexes.len().saturating_mul(bits as usize))?;
    for &index in indexes {
        s.write_bits(index, bits)?;
    }
    Ok(())
}
