//! The codec: one [`BitBuffer`] with a fixed bit capacity, plus the cursor capabilities
//! ([`BitCursor`], [`BitSink`], [`BitSource`]) that the primitive layers are built on.
//!
//! Primitive families ([`Encoder`](crate::Encoder), [`Decoder`](crate::Decoder),
//! [`AcnEncoder`](crate::AcnEncoder), [`AcnDecoder`](crate::AcnDecoder)) are extension
//! traits with blanket impls over these capabilities, so any sink/source gets the whole
//! catalogue and [`Codec`] gets both directions.

use crate::bitbuffer::BitBuffer;
use crate::error::{CodecError, DecodeResult, Decoded, EncodeResult, Encoded};

/// Capacity used by [`Codec::default`]: 8 Mibit.
pub const DEFAULT_BUFFER_BITS: usize = 8 * 1024 * 1024;

/// Cursor state common to both directions.
pub trait BitCursor {
    fn position(&self) -> usize;
    fn set_position(&mut self, position: usize) -> Result<(), CodecError>;
    fn bits_remaining(&self) -> usize;

    /// `InsufficientData` unless `bits` more bits fit after the cursor.
    fn ensure_room(&self, bits: usize) -> Result<(), CodecError> {
        let remaining = self.bits_remaining();
        if bits > remaining {
            return Err(CodecError::InsufficientData(format!(
                "need {} bits but only {} remain",
                bits, remaining
            )));
        }
        Ok(())
    }
}

/// Write side: MSB-first bit fields and byte blocks.
pub trait BitSink: BitCursor {
    fn write_bits(&mut self, value: u64, count: u32) -> Result<(), CodecError>;
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError>;
    /// Bits written from `start` up to the cursor, MSB-aligned.
    fn bits_since(&self, start: usize) -> Vec<u8>;
    /// High-water mark of written bits.
    fn written_bits(&self) -> usize;
    /// Return to `position` and drop everything written past `written_bits`.
    fn roll_back(&mut self, position: usize, written_bits: usize);
}

/// Read side.
pub trait BitSource: BitCursor {
    fn read_bits(&mut self, count: u32) -> Result<u64, CodecError>;
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, CodecError>;

    fn skip_bits(&mut self, count: usize) -> Result<(), CodecError> {
        self.ensure_room(count)?;
        let p = self.position();
        self.set_position(p + count)
    }
}

/// Run one encode primitive: on success report the bits it appended, on failure
/// roll back cursor and written data so a refused value leaves nothing behind, even
/// when it failed after writing some of its fields.
pub(crate) fn encode_with<S, F>(sink: &mut S, op: &str, f: F) -> EncodeResult
where
    S: BitSink + ?Sized,
    F: FnOnce(&mut S) -> Result<(), CodecError>,
{
    let start = sink.position();
    let written = sink.written_bits();
    match f(sink) {
        Ok(()) => Ok(Encoded {
            bits_encoded: sink.position() - start,
            encoded_data: sink.bits_since(start),
        }),
        Err(e) => {
            log::trace!("{} failed at bit {}: {}", op, start, e);
            sink.roll_back(start, written);
            Err(e.context(op))
        }
    }
}

/// Run one decode primitive. The cursor is left where the failure was detected.
pub(crate) fn decode_with<S, T, F>(source: &mut S, op: &str, f: F) -> DecodeResult<T>
where
    S: BitSource + ?Sized,
    F: FnOnce(&mut S) -> Result<T, CodecError>,
{
    let start = source.position();
    match f(source) {
        Ok(value) => Ok(Decoded {
            value,
            bits_consumed: source.position() - start,
        }),
        Err(e) => {
            log::trace!("{} failed after bit {}: {}", op, start, e);
            Err(e.context(op))
        }
    }
}

/// Owns one bit buffer for the duration of a message (de)serialization.
///
/// `Clone`/[`Codec::copy`] is a deep copy of bytes and cursor; use it to branch a
/// speculative decode without touching the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    buffer: BitBuffer,
    max_bits: usize,
}

impl Codec {
    /// Empty codec for encoding. `max_bits` must be positive.
    pub fn new(max_bits: usize) -> Result<Self, CodecError> {
        let buffer = BitBuffer::new(max_bits)?;
        log::debug!("codec created with capacity {} bits", max_bits);
        Ok(Codec { buffer, max_bits })
    }

    /// Codec over existing bytes, positioned at bit 0, for decoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let buffer = BitBuffer::from_bytes(bytes)?;
        let max_bits = buffer.capacity_bits();
        log::debug!("codec loaded with {} bytes", bytes.len());
        Ok(Codec { buffer, max_bits })
    }

    pub fn max_bits(&self) -> usize {
        self.max_bits
    }

    pub fn copy(&self) -> Codec {
        self.clone()
    }

    /// Rewind to bit 0 and clear written content.
    pub fn reset(&mut self) {
        log::debug!("codec reset ({} bits used)", self.buffer.size_in_bits());
        self.buffer.reset();
    }

    /// Rewind to bit 0 keeping the content (decode what was just encoded).
    pub fn rewind(&mut self) {
        self.buffer.rewind();
    }

    pub fn size_in_bits(&self) -> usize {
        self.buffer.size_in_bits()
    }

    pub fn is_at_end(&self) -> bool {
        self.buffer.is_at_end()
    }

    /// Minimal byte-aligned prefix actually used.
    pub fn get_bitstream_buffer(&self) -> &[u8] {
        self.buffer.get_data()
    }

    pub fn get_data_copy(&self) -> Vec<u8> {
        self.buffer.get_data_copy()
    }

    pub fn buffer(&self) -> &BitBuffer {
        &self.buffer
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec {
            buffer: BitBuffer::zeroed(DEFAULT_BUFFER_BITS),
            max_bits: DEFAULT_BUFFER_BITS,
        }
    }
}

impl BitCursor for Codec {
    fn position(&self) -> usize {
        self.buffer.position()
    }

    fn set_position(&mut self, position: usize) -> Result<(), CodecError> {
        Ok(self.buffer.set_bit_position(position)?)
    }

    fn bits_remaining(&self) -> usize {
        self.buffer.bits_remaining()
    }
}

impl BitSink for Codec {
    fn write_bits(&mut self, value: u64, count: u32) -> Result<(), CodecError> {
        Ok(self.buffer.write_bits(value, count)?)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        Ok(self.buffer.write_bytes(bytes)?)
    }

    fn bits_since(&self, start: usize) -> Vec<u8> {
        self.buffer.extract(start, self.buffer.position())
    }

    fn written_bits(&self) -> usize {
        self.buffer.size_in_bits()
    }

    fn roll_back(&mut self, position: usize, written_bits: usize) {
        self.buffer.roll_back(position, written_bits);
    }
}

impl BitSource for Codec {
    fn read_bits(&mut self, count: u32) -> Result<u64, CodecError> {
        Ok(self.buffer.read_bits(count)?)
    }

    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, CodecError> {
        Ok(self.buffer.read_bytes(count)?)
    }
}
