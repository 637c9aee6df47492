//! Fixed-capacity, bit-addressable storage with a single cursor.
//!
//! Bits are stored most-significant-bit first within each byte, and every field is
//! written with its own most-significant bit first. A read or write of `n` bits
//! requires `position + n <= capacity`; the check happens before anything is touched,
//! so a failed call never leaves a partially written field behind.

use thiserror::Error;

/// Failure raised by [`BitBuffer`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitStreamError {
    #[error("need {requested} bits but only {remaining} remain")]
    Overrun { requested: usize, remaining: usize },
    #[error("value {value:#x} does not fit in {count} bits")]
    ValueTooWide { value: u64, count: u32 },
    #[error("cannot transfer {0} bits at once (max 64)")]
    CountTooLarge(u32),
    #[error("bit position {position} is beyond capacity {capacity}")]
    PositionOutOfRange { position: usize, capacity: usize },
    #[error("buffer capacity must be greater than zero")]
    ZeroCapacity,
}

/// Owned bit buffer. Cloning yields a fully independent copy (bytes and cursor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u8>,
    capacity_bits: usize,
    position_bits: usize,
    /// High-water mark of written (or loaded) bits; drives [`BitBuffer::get_data`].
    size_bits: usize,
}

impl BitBuffer {
    /// Create an empty buffer able to hold `capacity_bits` bits.
    pub fn new(capacity_bits: usize) -> Result<Self, BitStreamError> {
        if capacity_bits == 0 {
            return Err(BitStreamError::ZeroCapacity);
        }
        Ok(BitBuffer::zeroed(capacity_bits))
    }

    pub(crate) fn zeroed(capacity_bits: usize) -> Self {
        BitBuffer {
            data: vec![0u8; capacity_bits.div_ceil(8)],
            capacity_bits,
            position_bits: 0,
            size_bits: 0,
        }
    }

    /// Wrap existing bytes for reading. Capacity is `bytes.len() * 8`, all bits count as used.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BitStreamError> {
        if bytes.is_empty() {
            return Err(BitStreamError::ZeroCapacity);
        }
        let capacity_bits = bytes.len() * 8;
        Ok(BitBuffer {
            data: bytes.to_vec(),
            capacity_bits,
            position_bits: 0,
            size_bits: capacity_bits,
        })
    }

    pub fn capacity_bits(&self) -> usize {
        self.capacity_bits
    }

    pub fn position(&self) -> usize {
        self.position_bits
    }

    /// Number of bits holding data (written or loaded).
    pub fn size_in_bits(&self) -> usize {
        self.size_bits
    }

    pub fn bits_remaining(&self) -> usize {
        self.capacity_bits - self.position_bits
    }

    pub fn is_at_end(&self) -> bool {
        self.position_bits == self.capacity_bits
    }

    pub fn set_bit_position(&mut self, position: usize) -> Result<(), BitStreamError> {
        if position > self.capacity_bits {
            return Err(BitStreamError::PositionOutOfRange {
                position,
                capacity: self.capacity_bits,
            });
        }
        self.position_bits = position;
        Ok(())
    }

    /// Move the cursor back to bit 0, keeping the content.
    pub fn rewind(&mut self) {
        self.position_bits = 0;
    }

    /// Undo an interrupted write: the high-water mark drops back to `size_bits`, every
    /// bit above it is cleared and the cursor returns to `position`.
    pub fn roll_back(&mut self, position: usize, size_bits: usize) {
        let size_bits = size_bits.min(self.capacity_bits);
        for bit in size_bits..self.size_bits {
            self.data[bit / 8] &= !(0x80u8 >> (bit % 8));
        }
        self.size_bits = self.size_bits.min(size_bits);
        self.position_bits = position.min(self.capacity_bits);
    }

    /// Rewind the cursor and forget written content. Bytes are zeroed so stale bits
    /// can never leak into a later extraction.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|b| *b = 0);
        self.position_bits = 0;
        self.size_bits = 0;
    }

    /// Fails with [`BitStreamError::Overrun`] unless `count` more bits fit after the cursor.
    pub fn ensure_room(&self, count: usize) -> Result<(), BitStreamError> {
        let remaining = self.bits_remaining();
        if count > remaining {
            return Err(BitStreamError::Overrun {
                requested: count,
                remaining,
            });
        }
        Ok(())
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), BitStreamError> {
        self.ensure_room(1)?;
        self.put_bit(bit);
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<bool, BitStreamError> {
        self.ensure_room(1)?;
        Ok(self.take_bit())
    }

    /// Write the low `count` bits of `value`, MSB first. `count == 0` is a no-op.
    pub fn write_bits(&mut self, value: u64, count: u32) -> Result<(), BitStreamError> {
        if count > 64 {
            return Err(BitStreamError::CountTooLarge(count));
        }
        if count == 0 {
            return Ok(());
        }
        if count < 64 && value >> count != 0 {
            return Err(BitStreamError::ValueTooWide { value, count });
        }
        self.ensure_room(count as usize)?;

        let mut remaining = count;
        while remaining > 0 {
            let bit_index = (self.position_bits % 8) as u32;
            let room = 8 - bit_index;
            let take = room.min(remaining);
            let shift = remaining - take;
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;
            let byte = &mut self.data[self.position_bits / 8];
            let clear_mask = (((1u16 << take) - 1) as u8) << (room - take);
            *byte = (*byte & !clear_mask) | (chunk << (room - take));
            self.position_bits += take as usize;
            remaining -= take;
        }
        self.size_bits = self.size_bits.max(self.position_bits);
        Ok(())
    }

    /// Read `count` bits as an unsigned value, MSB first. `count == 0` returns 0.
    pub fn read_bits(&mut self, count: u32) -> Result<u64, BitStreamError> {
        if count > 64 {
            return Err(BitStreamError::CountTooLarge(count));
        }
        if count == 0 {
            return Ok(0);
        }
        self.ensure_room(count as usize)?;

        let mut out = 0u64;
        let mut remaining = count;
        while remaining > 0 {
            let bit_index = (self.position_bits % 8) as u32;
            let room = 8 - bit_index;
            let take = room.min(remaining);
            let byte = self.data[self.position_bits / 8];
            let chunk = (byte >> (room - take)) & (((1u16 << take) - 1) as u8);
            out = (out << take) | chunk as u64;
            self.position_bits += take as usize;
            remaining -= take;
        }
        Ok(out)
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), BitStreamError> {
        self.write_bits(byte as u64, 8)
    }

    pub fn read_byte(&mut self) -> Result<u8, BitStreamError> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Write a block of bytes at the cursor (which need not be byte aligned).
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BitStreamError> {
        self.ensure_room(bytes.len().saturating_mul(8))?;
        if self.position_bits % 8 == 0 {
            let start = self.position_bits / 8;
            self.data[start..start + bytes.len()].copy_from_slice(bytes);
            self.position_bits += bytes.len() * 8;
            self.size_bits = self.size_bits.max(self.position_bits);
            return Ok(());
        }
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, BitStreamError> {
        self.ensure_room(count.saturating_mul(8))?;
        if self.position_bits % 8 == 0 {
            let start = self.position_bits / 8;
            self.position_bits += count * 8;
            return Ok(self.data[start..start + count].to_vec());
        }
        (0..count).map(|_| self.read_byte()).collect()
    }

    /// Advance the cursor to the next multiple of 8. When `write` is set the gap is
    /// zero-filled and counted as written data; otherwise it is skipped.
    pub fn align_to_byte(&mut self, write: bool) -> Result<usize, BitStreamError> {
        let pad = (8 - self.position_bits % 8) % 8;
        if write {
            self.write_bits(0, pad as u32)?;
        } else {
            self.ensure_room(pad)?;
            self.position_bits += pad;
        }
        Ok(pad)
    }

    /// Used prefix of the buffer: `ceil(size_in_bits / 8)` bytes.
    pub fn get_data(&self) -> &[u8] {
        &self.data[..self.size_bits.div_ceil(8)]
    }

    pub fn get_data_copy(&self) -> Vec<u8> {
        self.get_data().to_vec()
    }

    /// Copy the bits in `[start, end)` into a fresh MSB-aligned, zero-padded byte vector.
    pub fn extract(&self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.capacity_bits);
        if start >= end {
            return Vec::new();
        }
        let len = end - start;
        let mut out = vec![0u8; len.div_ceil(8)];
        for i in 0..len {
            let src = start + i;
            if self.data[src / 8] & (0x80 >> (src % 8)) != 0 {
                out[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out
    }

    fn put_bit(&mut self, bit: bool) {
        let mask = 0x80u8 >> (self.position_bits % 8);
        let byte = &mut self.data[self.position_bits / 8];
        if bit {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.position_bits += 1;
        self.size_bits = self.size_bits.max(self.position_bits);
    }

    fn take_bit(&mut self) -> bool {
        let mask = 0x80u8 >> (self.position_bits % 8);
        let bit = self.data[self.position_bits / 8] & mask != 0;
        self.position_bits += 1;
        bit
    }
}
