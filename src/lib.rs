//! # acnrt: bit-level runtime for ASN.1 PER/UPER and ACN encodings
//!
//! The runtime that generated message types call into, one primitive per field, to
//! produce and consume compact bit-packed encodings with exact bit widths.
//!
//! ## Layers
//!
//! - **Bit buffer**: [`BitBuffer`], fixed capacity, MSB-first, bounds-checked.
//! - **Codec**: [`Codec`] owns one buffer; `copy()` branches a speculative decode.
//! - **Generic primitives**: [`Encoder`] / [`Decoder`] (constrained whole numbers,
//!   unsigned fields, enumerations, NULL, alignment, raw bytes).
//! - **ACN primitives**: [`AcnEncoder`] / [`AcnDecoder`] (fixed and variable size
//!   integers, two's complement, BCD, IEEE-754 reals, length fields, strings).
//! - **Helpers**: [`helpers`] for width arithmetic and constraint predicates,
//!   [`verification::Segment`] as a bit-composition oracle.
//! - **Messages**: [`AcnMessage`] plus [`encode_message`] / [`decode_message`].
//!
//! Primitive families are extension traits with blanket impls over the
//! [`BitSink`] / [`BitSource`] capabilities, so bring the traits into scope:
//!
//! ```
//! use acnrt::{AcnDecoder, AcnEncoder, Codec, Decoder, Encoder};
//!
//! let mut enc = Codec::new(64).unwrap();
//! enc.encode_integer(5, 0, 7, None).unwrap();
//! enc.enc_int_twos_complement_const_size_8(-5).unwrap();
//!
//! let mut dec = Codec::from_bytes(enc.get_bitstream_buffer()).unwrap();
//! assert_eq!(dec.decode_integer(Some(0), Some(7), None).unwrap().value, 5);
//! assert_eq!(dec.dec_int_twos_complement_const_size_8().unwrap().value, -5);
//! ```
//!
//! ## Results
//!
//! Every primitive returns [`EncodeResult`] or [`DecodeResult`]; failures carry an
//! [`ErrorCode`] and a message. [`Outcome`] exposes `success()` / `error_code()` /
//! `error_message()` on either.

pub mod acn_decoder;
pub mod acn_encoder;
pub mod bitbuffer;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod helpers;
pub mod message;
pub mod verification;

pub use acn_decoder::AcnDecoder;
pub use acn_encoder::{AcnEncoder, BCD_TERMINATOR};
pub use bitbuffer::{BitBuffer, BitStreamError};
pub use codec::{BitCursor, BitSink, BitSource, Codec, DEFAULT_BUFFER_BITS};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{CodecError, DecodeResult, Decoded, EncodeResult, Encoded, ErrorCode, Outcome};
pub use message::{decode_message, decode_message_with_extent, encode_message, AcnMessage};
pub use verification::Segment;
