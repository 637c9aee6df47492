//! ACN decode catalogue, the mirror of [`AcnEncoder`](crate::AcnEncoder).
//!
//! Each operation checks that enough bits remain before reading a field and validates
//! what it read: BCD nibbles above 9 abort immediately, char indexes outside the
//! alphabet and lengths outside their bounds are constraint violations.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::acn_encoder::BCD_TERMINATOR;
use crate::codec::{decode_with, BitCursor, BitSource};
use crate::decoder::Decoder;
use crate::error::{CodecError, DecodeResult};
use crate::helpers::{index_bits, sign_extend, IA5_ALPHABET};

/// Decode side of the ACN layer. Implemented for every [`BitSource`].
pub trait AcnDecoder: Decoder {
    fn dec_int_positive_integer_const_size(&mut self, size_in_bits: u32) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size", |s| {
            take_unsigned(s, size_in_bits)
        })
    }

    fn dec_int_positive_integer_const_size_8(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_8", |s| take_unsigned(s, 8))
    }

    fn dec_int_positive_integer_const_size_big_endian_16(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_big_endian_16", |s| {
            take_ordered::<BigEndian, _>(s, 2)
        })
    }

    fn dec_int_positive_integer_const_size_big_endian_32(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_big_endian_32", |s| {
            take_ordered::<BigEndian, _>(s, 4)
        })
    }

    fn dec_int_positive_integer_const_size_big_endian_64(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_big_endian_64", |s| {
            take_ordered::<BigEndian, _>(s, 8)
        })
    }

    fn dec_int_positive_integer_const_size_little_endian_16(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_little_endian_16", |s| {
            take_ordered::<LittleEndian, _>(s, 2)
        })
    }

    fn dec_int_positive_integer_const_size_little_endian_32(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_little_endian_32", |s| {
            take_ordered::<LittleEndian, _>(s, 4)
        })
    }

    fn dec_int_positive_integer_const_size_little_endian_64(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_const_size_little_endian_64", |s| {
            take_ordered::<LittleEndian, _>(s, 8)
        })
    }

    fn dec_int_positive_integer_var_size_length_embedded(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_positive_integer_var_size_length_embedded", |s| {
            let nbytes = take_byte_count(s)?;
            if nbytes == 0 {
                return Ok(0);
            }
            take_ordered::<BigEndian, _>(s, nbytes)
        })
    }

    fn dec_int_twos_complement_const_size(&mut self, size_in_bits: u32) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size", |s| {
            Ok(sign_extend(take_unsigned(s, size_in_bits)?, size_in_bits))
        })
    }

    fn dec_int_twos_complement_const_size_8(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_8", |s| {
            Ok(sign_extend(take_unsigned(s, 8)?, 8))
        })
    }

    fn dec_int_twos_complement_const_size_big_endian_16(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_big_endian_16", |s| {
            Ok(sign_extend(take_ordered::<BigEndian, _>(s, 2)?, 16))
        })
    }

    fn dec_int_twos_complement_const_size_big_endian_32(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_big_endian_32", |s| {
            Ok(sign_extend(take_ordered::<BigEndian, _>(s, 4)?, 32))
        })
    }

    fn dec_int_twos_complement_const_size_big_endian_64(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_big_endian_64", |s| {
            Ok(sign_extend(take_ordered::<BigEndian, _>(s, 8)?, 64))
        })
    }

    fn dec_int_twos_complement_const_size_little_endian_16(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_little_endian_16", |s| {
            Ok(sign_extend(take_ordered::<LittleEndian, _>(s, 2)?, 16))
        })
    }

    fn dec_int_twos_complement_const_size_little_endian_32(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_little_endian_32", |s| {
            Ok(sign_extend(take_ordered::<LittleEndian, _>(s, 4)?, 32))
        })
    }

    fn dec_int_twos_complement_const_size_little_endian_64(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_const_size_little_endian_64", |s| {
            Ok(sign_extend(take_ordered::<LittleEndian, _>(s, 8)?, 64))
        })
    }

    fn dec_int_twos_complement_var_size_length_embedded(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_int_twos_complement_var_size_length_embedded", |s| {
            let nbytes = take_byte_count(s)?;
            if nbytes == 0 {
                return Ok(0);
            }
            Ok(sign_extend(take_ordered::<BigEndian, _>(s, nbytes)?, nbytes as u32 * 8))
        })
    }

    fn dec_int_bcd_const_size(&mut self, num_nibbles: usize) -> DecodeResult<u64> {
        decode_with(self, "dec_int_bcd_const_size", |s| {
            s.ensure_room(num_nibbles.saturating_mul(4))?;
            let mut value = 0u64;
            for _ in 0..num_nibbles {
                value = push_digit(value, take_digit(s)?)?;
            }
            Ok(value)
        })
    }

    fn dec_int_bcd_var_size_length_embedded(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_bcd_var_size_length_embedded", |s| {
            let count = s.read_bits(8)? as usize;
            s.ensure_room(count * 4)?;
            let mut value = 0u64;
            for _ in 0..count {
                value = push_digit(value, take_digit(s)?)?;
            }
            Ok(value)
        })
    }

    fn dec_int_bcd_var_size_null_terminated(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_int_bcd_var_size_null_terminated", |s| {
            let mut value = 0u64;
            loop {
                let nibble = s.read_bits(4)? as u8;
                if nibble == BCD_TERMINATOR {
                    return Ok(value);
                }
                value = push_digit(value, check_digit(nibble)?)?;
            }
        })
    }

    fn dec_uint_ascii_const_size(&mut self, _num_chars: usize) -> DecodeResult<u64> {
        decode_with(self, "dec_uint_ascii_const_size", |_| Err(unsupported()))
    }

    fn dec_sint_ascii_const_size(&mut self, _num_chars: usize) -> DecodeResult<i64> {
        decode_with(self, "dec_sint_ascii_const_size", |_| Err(unsupported()))
    }

    fn dec_uint_ascii_var_size_length_embedded(&mut self) -> DecodeResult<u64> {
        decode_with(self, "dec_uint_ascii_var_size_length_embedded", |_| Err(unsupported()))
    }

    fn dec_sint_ascii_var_size_length_embedded(&mut self) -> DecodeResult<i64> {
        decode_with(self, "dec_sint_ascii_var_size_length_embedded", |_| Err(unsupported()))
    }

    fn dec_uint_ascii_var_size_null_terminated(&mut self, _terminator: &[u8]) -> DecodeResult<u64> {
        decode_with(self, "dec_uint_ascii_var_size_null_terminated", |_| Err(unsupported()))
    }

    fn dec_sint_ascii_var_size_null_terminated(&mut self, _terminator: &[u8]) -> DecodeResult<i64> {
        decode_with(self, "dec_sint_ascii_var_size_null_terminated", |_| Err(unsupported()))
    }

    fn dec_real_ieee754_32_big_endian(&mut self) -> DecodeResult<f32> {
        decode_with(self, "dec_real_ieee754_32_big_endian", |s| {
            Ok(BigEndian::read_f32(&s.read_bytes(4)?))
        })
    }

    fn dec_real_ieee754_32_little_endian(&mut self) -> DecodeResult<f32> {
        decode_with(self, "dec_real_ieee754_32_little_endian", |s| {
            Ok(LittleEndian::read_f32(&s.read_bytes(4)?))
        })
    }

    fn dec_real_ieee754_64_big_endian(&mut self) -> DecodeResult<f64> {
        decode_with(self, "dec_real_ieee754_64_big_endian", |s| {
            Ok(BigEndian::read_f64(&s.read_bytes(8)?))
        })
    }

    fn dec_real_ieee754_64_little_endian(&mut self) -> DecodeResult<f64> {
        decode_with(self, "dec_real_ieee754_64_little_endian", |s| {
            Ok(LittleEndian::read_f64(&s.read_bytes(8)?))
        })
    }

    fn dec_length(&mut self, length_size_in_bits: u32) -> DecodeResult<u64> {
        decode_with(self, "dec_length", |s| s.read_bits(length_size_in_bits))
    }

    fn dec_string_ascii_fixed_size(&mut self, size: usize) -> DecodeResult<String> {
        decode_with(self, "dec_string_ascii_fixed_size", |s| into_string(s.read_bytes(size)?))
    }

    fn dec_string_ascii_null_terminated(&mut self, max_len: usize, null_character: u8) -> DecodeResult<String> {
        decode_with(self, "dec_string_ascii_null_terminated", |s| {
            take_null_terminated(s, max_len, &[null_character])
        })
    }

    fn dec_string_ascii_null_terminated_mult(&mut self, max_len: usize, terminator: &[u8]) -> DecodeResult<String> {
        decode_with(self, "dec_string_ascii_null_terminated_mult", |s| {
            take_null_terminated(s, max_len, terminator)
        })
    }

    /// Reads `ext_size` characters; the length was decoded from another field.
    fn dec_string_ascii_external_field_determinant(&mut self, max_len: usize, ext_size: u64) -> DecodeResult<String> {
        decode_with(self, "dec_string_ascii_external_field_determinant", |s| {
            let len = check_ext_size(ext_size, max_len)?;
            into_string(s.read_bytes(len)?)
        })
    }

    fn dec_string_ascii_internal_field_determinant(&mut self, max_len: usize, min_len: usize) -> DecodeResult<String> {
        decode_with(self, "dec_string_ascii_internal_field_determinant", |s| {
            let len = s.decode_integer(Some(min_len as i64), Some(max_len as i64), None)?.value;
            into_string(s.read_bytes(len as usize)?)
        })
    }

    fn dec_string_char_index_fixed_size(&mut self, size: usize, alphabet: &[u8]) -> DecodeResult<String> {
        decode_with(self, "dec_string_char_index_fixed_size", |s| take_char_indexes(s, alphabet, size))
    }

    fn dec_string_char_index_external_field_determinant(
        &mut self,
        max_len: usize,
        alphabet: &[u8],
        ext_size: u64,
    ) -> DecodeResult<String> {
        decode_with(self, "dec_string_char_index_external_field_determinant", |s| {
            let len = check_ext_size(ext_size, max_len)?;
            take_char_indexes(s, alphabet, len)
        })
    }

    fn dec_string_char_index_internal_field_determinant(
        &mut self,
        max_len: usize,
        alphabet: &[u8],
        min_len: usize,
    ) -> DecodeResult<String> {
        decode_with(self, "dec_string_char_index_internal_field_determinant", |s| {
            let len = s.decode_integer(Some(min_len as i64), Some(max_len as i64), None)?.value;
            take_char_indexes(s, alphabet, len as usize)
        })
    }

    fn dec_ia5_string_char_index_external_field_determinant(&mut self, max_len: usize, ext_size: u64) -> DecodeResult<String> {
        decode_with(self, "dec_ia5_string_char_index_external_field_determinant", |s| {
            let len = check_ext_size(ext_size, max_len)?;
            take_char_indexes(s, &IA5_ALPHABET, len)
        })
    }

    fn dec_ia5_string_char_index_internal_field_determinant(&mut self, max_len: usize, min_len: usize) -> DecodeResult<String> {
        decode_with(self, "dec_ia5_string_char_index_internal_field_determinant", |s| {
            let len = s.decode_integer(Some(min_len as i64), Some(max_len as i64), None)?.value;
            take_char_indexes(s, &IA5_ALPHABET, len as usize)
        })
    }
}

impl<S: BitSource + ?Sized> AcnDecoder for S {}

fn unsupported() -> CodecError {
    CodecError::UnsupportedOperation("ASCII integer encodings are not implemented".to_string())
}

fn take_unsigned<S: BitSource + ?Sized>(s: &mut S, bits: u32) -> Result<u64, CodecError> {
    if bits == 0 || bits > 64 {
        return Err(CodecError::InvalidValue(format!("field width {} not in 1..=64", bits)));
    }
    s.read_bits(bits)
}

fn take_ordered<B: ByteOrder, S: BitSource + ?Sized>(s: &mut S, nbytes: usize) -> Result<u64, CodecError> {
    let bytes = s.read_bytes(nbytes)?;
    Ok(B::read_uint(&bytes, nbytes))
}

/// Length byte of a length-embedded integer; more than 8 bytes cannot be held.
fn take_byte_count<S: BitSource + ?Sized>(s: &mut S) -> Result<usize, CodecError> {
    let nbytes = s.read_bits(8)? as usize;
    if nbytes > 8 {
        return Err(CodecError::InvalidValue(format!("{} bytes exceed a 64-bit integer", nbytes)));
    }
    Ok(nbytes)
}

fn check_digit(nibble: u8) -> Result<u8, CodecError> {
    if nibble > 9 {
        return Err(CodecError::InvalidValue(format!("invalid BCD digit {:#x}", nibble)));
    }
    Ok(nibble)
}

fn take_digit<S: BitSource + ?Sized>(s: &mut S) -> Result<u8, CodecError> {
    check_digit(s.read_bits(4)? as u8)
}

fn push_digit(value: u64, digit: u8) -> Result<u64, CodecError> {
    value
        .checked_mul(10)
        .and_then(|v| v.checked_add(digit as u64))
        .ok_or_else(|| CodecError::InvalidValue("BCD number exceeds 64 bits".to_string()))
}

fn into_string(bytes: Vec<u8>) -> Result<String, CodecError> {
    String::from_utf8(bytes).map_err(|e| CodecError::InvalidValue(format!("not a valid string: {}", e)))
}

fn check_ext_size(ext_size: u64, max_len: usize) -> Result<usize, CodecError> {
    if ext_size > max_len as u64 {
        return Err(CodecError::ConstraintViolation(format!(
            "length {} exceeds maximum {}",
            ext_size, max_len
        )));
    }
    Ok(ext_size as usize)
}

/// Read characters until `terminator` or until the `max_len + terminator.len()` byte
/// window is exhausted; in the latter case the first `max_len` characters are returned.
fn take_null_terminated<S: BitSource + ?Sized>(
    s: &mut S,
    max_len: usize,
    terminator: &[u8],
) -> Result<String, CodecError> {
    if terminator.is_empty() {
        return Err(CodecError::InvalidValue("empty terminator".to_string()));
    }
    let window = max_len + terminator.len();
    let mut buf = Vec::with_capacity(window);
    while buf.len() < window {
        buf.push(s.read_bits(8)? as u8);
        if buf.ends_with(terminator) {
            buf.truncate(buf.len() - terminator.len());
            return into_string(buf);
        }
    }
    buf.truncate(max_len);
    into_string(buf)
}

fn take_char_indexes<S: BitSource + ?Sized>(s: &mut S, alphabet: &[u8], len: usize) -> Result<String, CodecError> {
    let bits = index_bits(alphabet.len());
    s.ensure_room(len.saturating_mul(bits as usize))?;
    let mut buf = Vec::with_capacity(len);
    for _ in 0..len {
        let index = s.read_bits(bits)? as usize;
        let c = alphabet.get(index).copied().ok_or_else(|| {
            CodecError::ConstraintViolation(format!("index {} outside alphabet of {}", index, alphabet.len()))
        })?;
        buf.push(c);
    }
    into_string(buf)
}
