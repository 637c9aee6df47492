//! Outcome types shared by every primitive.
//!
//! Primitives never panic on data-dependent failures; they return [`EncodeResult`] or
//! [`DecodeResult`]. The [`Outcome`] trait gives both the flat record view
//! (`success`, `error_code`, `error_message`) used by generated message types.

use crate::bitbuffer::BitStreamError;

/// Classification of a primitive outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    InsufficientData,
    InvalidValue,
    ConstraintViolation,
    BufferOverflow,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Buffer overflow: {0}")]
    BufferOverflow(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl CodecError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CodecError::InsufficientData(_) => ErrorCode::InsufficientData,
            CodecError::InvalidValue(_) => ErrorCode::InvalidValue,
            CodecError::ConstraintViolation(_) => ErrorCode::ConstraintViolation,
            CodecError::BufferOverflow(_) => ErrorCode::BufferOverflow,
            CodecError::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CodecError::InsufficientData(m)
            | CodecError::InvalidValue(m)
            | CodecError::ConstraintViolation(m)
            | CodecError::BufferOverflow(m)
            | CodecError::UnsupportedOperation(m) => m,
        }
    }

    /// Prefix the message with the name of the operation that failed.
    pub fn context(self, op: &str) -> Self {
        match self {
            CodecError::InsufficientData(m) => CodecError::InsufficientData(format!("{}: {}", op, m)),
            CodecError::InvalidValue(m) => CodecError::InvalidValue(format!("{}: {}", op, m)),
            CodecError::ConstraintViolation(m) => {
                CodecError::ConstraintViolation(format!("{}: {}", op, m))
            }
            CodecError::BufferOverflow(m) => CodecError::BufferOverflow(format!("{}: {}", op, m)),
            CodecError::UnsupportedOperation(m) => {
                CodecError::UnsupportedOperation(format!("{}: {}", op, m))
            }
        }
    }
}

impl From<BitStreamError> for CodecError {
    fn from(e: BitStreamError) -> Self {
        match e {
            BitStreamError::Overrun { .. } | BitStreamError::PositionOutOfRange { .. } => {
                CodecError::InsufficientData(e.to_string())
            }
            BitStreamError::ValueTooWide { .. } | BitStreamError::CountTooLarge(_) => {
                CodecError::InvalidValue(e.to_string())
            }
            BitStreamError::ZeroCapacity => CodecError::BufferOverflow(e.to_string()),
        }
    }
}

/// Bits appended by one encode primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bits_encoded: usize,
    /// The appended bits, MSB-aligned and zero-padded to whole bytes.
    pub encoded_data: Vec<u8>,
}

/// Value reconstructed by one decode primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub bits_consumed: usize,
}

impl<T> Decoded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            bits_consumed: self.bits_consumed,
        }
    }
}

pub type EncodeResult = Result<Encoded, CodecError>;
pub type DecodeResult<T> = Result<Decoded<T>, CodecError>;

/// Record-style view over a primitive outcome.
pub trait Outcome {
    fn success(&self) -> bool;
    fn error_code(&self) -> ErrorCode;
    fn error_message(&self) -> Option<&str>;
}

impl<T> Outcome for Result<T, CodecError> {
    fn success(&self) -> bool {
        self.is_ok()
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Ok(_) => ErrorCode::Success,
            Err(e) => e.code(),
        }
    }

    fn error_message(&self) -> Option<&str> {
        self.as_ref().err().map(CodecError::message)
    }
}
