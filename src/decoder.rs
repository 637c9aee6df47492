//! Generic decode primitives, symmetric to [`Encoder`](crate::Encoder).
//!
//! Structural shortfalls report `InsufficientData`; values that decode cleanly but fall
//! outside the declared range or candidate set report `ConstraintViolation`.

use crate::codec::{decode_with, BitCursor, BitSource};
use crate::error::{CodecError, DecodeResult};
use crate::helpers::{bits_needed, bytes_to_bitstring, index_bits, in_range};

/// Decode side of the generic primitive layer. Implemented for every [`BitSource`].
pub trait Decoder: BitSource {
    /// With both bounds: reads `bit_length(max_val - min_val)` bits and adds `min_val`.
    /// Without a full range: reads `size_in_bits` bits as unsigned and checks whichever
    /// bound was supplied. Neither a range nor a size is `InvalidValue`.
    fn decode_integer(
        &mut self,
        min_val: Option<i64>,
        max_val: Option<i64>,
        size_in_bits: Option<u32>,
    ) -> DecodeResult<i64> {
        decode_with(self, "decode_integer", |s| {
            let value = match (min_val, max_val, size_in_bits) {
                (Some(min), Some(max), _) => {
                    if min > max {
                        return Err(CodecError::InvalidValue(format!("empty range [{}, {}]", min, max)));
                    }
                    let raw = s.read_bits(bits_needed(min, max))?;
                    let v = min as i128 + raw as i128;
                    if v > max as i128 {
                        return Err(CodecError::ConstraintViolation(format!(
                            "{} outside [{}, {}]",
                            v, min, max
                        )));
                    }
                    v as i64
                }
                (_, _, Some(bits)) => {
                    let raw = s.read_bits(bits)?;
                    i64::try_from(raw).map_err(|_| {
                        CodecError::InvalidValue(format!("{} does not fit a signed 64-bit value", raw))
                    })?
                }
                _ => {
                    return Err(CodecError::InvalidValue(
                        "neither a range nor a bit size was given".to_string(),
                    ))
                }
            };
            let min = min_val.unwrap_or(i64::MIN);
            let max = max_val.unwrap_or(i64::MAX);
            if !in_range(value, min, max) {
                return Err(CodecError::ConstraintViolation(format!(
                    "{} outside [{}, {}]",
                    value, min, max
                )));
            }
            Ok(value)
        })
    }

    fn decode_unsigned_integer(&mut self, num_bits: u32) -> DecodeResult<u64> {
        decode_with(self, "decode_unsigned_integer", |s| s.read_bits(num_bits))
    }

    fn decode_boolean(&mut self) -> DecodeResult<bool> {
        decode_with(self, "decode_boolean", |s| Ok(s.read_bits(1)? == 1))
    }

    /// Reads a `ceil(log2(len))`-bit index and returns the matching candidate.
    fn decode_enumerated<T: Clone>(&mut self, candidates: &[T]) -> DecodeResult<T> {
        decode_with(self, "decode_enumerated", |s| {
            if candidates.is_empty() {
                return Err(CodecError::ConstraintViolation("no candidates".to_string()));
            }
            let index = s.read_bits(index_bits(candidates.len()))? as usize;
            candidates.get(index).cloned().ok_or_else(|| {
                CodecError::ConstraintViolation(format!(
                    "index {} out of {} candidates",
                    index,
                    candidates.len()
                ))
            })
        })
    }

    fn decode_null(&mut self) -> DecodeResult<()> {
        decode_with(self, "decode_null", |_| Ok(()))
    }

    /// Skip padding up to the next byte boundary; the value is the number of bits skipped.
    fn skip_to_byte(&mut self) -> DecodeResult<usize> {
        decode_with(self, "skip_to_byte", |s| skip_to(s, 8))
    }

    fn skip_to_word(&mut self) -> DecodeResult<usize> {
        decode_with(self, "skip_to_word", |s| skip_to(s, 16))
    }

    fn skip_to_dword(&mut self) -> DecodeResult<usize> {
        decode_with(self, "skip_to_dword", |s| skip_to(s, 32))
    }

    fn read_byte_array(&mut self, count: usize) -> DecodeResult<Vec<u8>> {
        decode_with(self, "read_byte_array", |s| s.read_bytes(count))
    }

    fn decode_octet_string_no_length(&mut self, count: usize) -> DecodeResult<Vec<u8>> {
        decode_with(self, "decode_octet_string_no_length", |s| s.read_bytes(count))
    }

    fn decode_bit_string(&mut self, nbits: usize) -> DecodeResult<String> {
        decode_with(self, "decode_bit_string", |s| {
            s.ensure_room(nbits)?;
            let mut bytes = s.read_bytes(nbits / 8)?;
            let tail = (nbits % 8) as u32;
            if tail > 0 {
                bytes.push((s.read_bits(tail)? as u8) << (8 - tail));
            }
            Ok(bytes_to_bitstring(&bytes, nbits))
        })
    }
}

impl<S: BitSource + ?Sized> Decoder for S {}

fn skip_to<S: BitSource + ?Sized>(s: &mut S, alignment: usize) -> Result<usize, CodecError> {
    let pad = (alignment - s.position() % alignment) % alignment;
    s.skip_bits(pad)?;
    Ok(pad)
}
