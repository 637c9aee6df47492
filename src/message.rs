//! Message-level entry points for generated types.
//!
//! A generated type implements [`AcnMessage`] by calling primitives field by field in
//! schema order. [`encode_message`] and [`decode_message`] escalate the first primitive
//! failure into a refusal: no bytes on encode, no value on decode.

use crate::codec::{BitCursor, Codec};
use crate::error::CodecError;

pub trait AcnMessage: Sized {
    /// Upper bound of the encoding in bits; sizes the encode buffer.
    const MAX_BITS: usize;

    /// Semantic checks on the whole value before anything is written.
    fn is_constraint_valid(&self) -> Result<(), CodecError> {
        Ok(())
    }

    fn encode_into(&self, codec: &mut Codec) -> Result<(), CodecError>;

    fn decode_from(codec: &mut Codec) -> Result<Self, CodecError>;
}

/// Encode a message into the minimal byte-aligned buffer.
pub fn encode_message<M: AcnMessage>(msg: &M) -> Result<Vec<u8>, CodecError> {
    msg.is_constraint_valid()?;
    let mut codec = Codec::new(M::MAX_BITS)?;
    msg.encode_into(&mut codec)?;
    log::debug!("encoded message in {} bits", codec.size_in_bits());
    Ok(codec.get_data_copy())
}

/// Decode one message from the start of `bytes`.
pub fn decode_message<M: AcnMessage>(bytes: &[u8]) -> Result<M, CodecError> {
    decode_message_with_extent(bytes).1
}

/// Decode one message and return `(bits_consumed, result)`. The bit count is meaningful
/// on failure too: it is where decoding stopped.
pub fn decode_message_with_extent<M: AcnMessage>(bytes: &[u8]) -> (usize, Result<M, CodecError>) {
    let mut codec = match Codec::from_bytes(bytes) {
        Ok(c) => c,
        Err(e) => return (0, Err(e)),
    };
    let decoded = M::decode_from(&mut codec).and_then(|m| {
        m.is_constraint_valid()?;
        Ok(m)
    });
    (codec.position(), decoded)
}
