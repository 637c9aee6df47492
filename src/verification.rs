//! Segment oracle: a `(length_in_bits, value)` pair describing exactly which bits an
//! operation appended. Used by tests to check that sequential writes compose.

use crate::error::Encoded;
use crate::helpers::{bit_length, fits_unsigned, mask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub length_in_bits: u32,
    pub value: u64,
}

impl Segment {
    /// `None` if `value` does not fit in `length_in_bits` (or the length exceeds 64).
    pub fn new(length_in_bits: u32, value: u64) -> Option<Self> {
        if length_in_bits > 64 || !fits_unsigned(value, length_in_bits) {
            return None;
        }
        Some(Segment { length_in_bits, value })
    }

    pub fn empty() -> Self {
        Segment { length_in_bits: 0, value: 0 }
    }

    /// Segment covering the bits reported by an encode primitive (up to 64 of them).
    pub fn from_encoded(encoded: &Encoded) -> Option<Self> {
        if encoded.bits_encoded > 64 {
            return None;
        }
        let bits = encoded.bits_encoded as u32;
        let mut value = 0u64;
        for i in 0..encoded.bits_encoded {
            let bit = encoded.encoded_data[i / 8] & (0x80 >> (i % 8)) != 0;
            value = (value << 1) | bit as u64;
        }
        Segment::new(bits, value)
    }

    /// `self` followed by `other`; `None` when the result would exceed 64 bits.
    pub fn concat(self, other: Segment) -> Option<Segment> {
        let len = self.length_in_bits + other.length_in_bits;
        if len > 64 {
            return None;
        }
        let head = if other.length_in_bits == 64 { 0 } else { self.value << other.length_in_bits };
        Some(Segment {
            length_in_bits: len,
            value: head | (other.value & mask(other.length_in_bits)),
        })
    }

    pub fn significant_bits(&self) -> u32 {
        bit_length(self.value)
    }
}
