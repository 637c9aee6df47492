//! Generic encode primitives: constrained whole numbers (offset encoding over a range),
//! raw unsigned fields, booleans, enumerations, NULL, alignment and bulk bytes.

use crate::codec::{encode_with, BitCursor, BitSink};
use crate::error::{CodecError, EncodeResult};
use crate::helpers::{bits_needed, bitstring_to_bytes, fits_unsigned, in_range, index_bits, range_span};

/// Encode side of the generic primitive layer. Implemented for every [`BitSink`].
pub trait Encoder: BitSink {
    /// Constrained whole number: validates `min_val <= value <= max_val` and writes
    /// `value - min_val` in `bit_length(max_val - min_val)` bits (0 bits for a single
    /// value range).
    ///
    /// A `size_in_bits` that disagrees with the range-derived width is ignored (and
    /// logged); the range always decides the width so decode stays symmetric.
    fn encode_integer(
        &mut self,
        value: i64,
        min_val: i64,
        max_val: i64,
        size_in_bits: Option<u32>,
    ) -> EncodeResult {
        encode_with(self, "encode_integer", |s| {
            if min_val > max_val {
                return Err(CodecError::InvalidValue(format!(
                    "empty range [{}, {}]",
                    min_val, max_val
                )));
            }
            if !in_range(value, min_val, max_val) {
                return Err(CodecError::ConstraintViolation(format!(
                    "{} outside [{}, {}]",
                    value, min_val, max_val
                )));
            }
            let bits = bits_needed(min_val, max_val);
            if let Some(requested) = size_in_bits {
                if requested != bits {
                    log::warn!(
                        "encode_integer: size_in_bits {} ignored, range [{}, {}] needs {}",
                        requested,
                        min_val,
                        max_val,
                        bits
                    );
                }
            }
            s.write_bits(range_span(min_val, value), bits)
        })
    }

    /// Raw unsigned field of `num_bits` bits, range `[0, 2^num_bits - 1]`.
    fn encode_unsigned_integer(&mut self, value: u64, num_bits: u32) -> EncodeResult {
        encode_with(self, "encode_unsigned_integer", |s| {
            if num_bits > 64 {
                return Err(CodecError::InvalidValue(format!("{} bits exceeds 64", num_bits)));
            }
            if !fits_unsigned(value, num_bits) {
                return Err(CodecError::InvalidValue(format!(
                    "{} does not fit in {} bits",
                    value, num_bits
                )));
            }
            s.write_bits(value, num_bits)
        })
    }

    fn encode_boolean(&mut self, value: bool) -> EncodeResult {
        encode_with(self, "encode_boolean", |s| s.write_bits(value as u64, 1))
    }

    /// Writes the index of `value` within `candidates` in `ceil(log2(len))` bits.
    fn encode_enumerated<T: PartialEq>(&mut self, value: &T, candidates: &[T]) -> EncodeResult {
        encode_with(self, "encode_enumerated", |s| {
            let index = candidates
                .iter()
                .position(|c| c == value)
                .ok_or_else(|| CodecError::ConstraintViolation("value is not a candidate".to_string()))?;
            s.write_bits(index as u64, index_bits(candidates.len()))
        })
    }

    fn encode_null(&mut self) -> EncodeResult {
        encode_with(self, "encode_null", |_| Ok(()))
    }

    fn align_to_byte(&mut self) -> EncodeResult {
        encode_with(self, "align_to_byte", |s| pad_to(s, 8))
    }

    fn align_to_word(&mut self) -> EncodeResult {
        encode_with(self, "align_to_word", |s| pad_to(s, 16))
    }

    fn align_to_dword(&mut self) -> EncodeResult {
        encode_with(self, "align_to_dword", |s| pad_to(s, 32))
    }

    /// Bytes with no length prefix; the caller owns the length.
    fn append_byte_array(&mut self, bytes: &[u8]) -> EncodeResult {
        encode_with(self, "append_byte_array", |s| s.write_bytes(bytes))
    }

    fn encode_octet_string_no_length(&mut self, bytes: &[u8]) -> EncodeResult {
        encode_with(self, "encode_octet_string_no_length", |s| s.write_bytes(bytes))
    }

    /// Bits given as `'0'`/`'1'` text, no length prefix.
    fn encode_bit_string(&mut self, bits: &str) -> EncodeResult {
        encode_with(self, "encode_bit_string", |s| {
            let bytes = bitstring_to_bytes(bits).ok_or_else(|| {
                CodecError::InvalidValue(format!("not a bit string: {:?}", bits))
            })?;
            s.ensure_room(bits.len())?;
            let whole = bits.len() / 8;
            s.write_bytes(&bytes[..whole])?;
            let tail = (bits.len() % 8) as u32;
            if tail > 0 {
                s.write_bits((bytes[whole] >> (8 - tail)) as u64, tail)?;
            }
            Ok(())
        })
    }
}

impl<S: BitSink + ?Sized> Encoder for S {}

fn pad_to<S: BitSink + ?Sized>(s: &mut S, alignment: usize) -> Result<(), CodecError> {
    let pad = (alignment - s.position() % alignment) % alignment;
    s.write_bits(0, pad as u32)
}
