//! Error types for every protocol layer.
//!
//! Each layer reports its own error enum; [`FrameError`] wraps them for the
//! end-to-end pipeline. All errors are scoped to a single frame and never
//! leave a decoder in a state that affects the next frame.

use thiserror::Error;

/// Errors from the CRC-16 layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcError {
    /// Recomputed checksum differs from the trailing checksum bytes
    #[error("CRC mismatch: expected {expected:#06x}, got {actual:#06x}")]
    Mismatch { expected: u16, actual: u16 },

    /// Input is shorter than the 2-byte checksum itself
    #[error("checksum-protected unit too short: {len} bytes")]
    TooShort { len: usize },

    /// Data plus checksum does not fit the largest protected unit
    #[error("data too large for checksum unit: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}

/// Errors from the COBS codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CobsError {
    /// Input exceeds the maximum encodable size
    #[error("input too large: {size} bytes (max {max})")]
    InputTooLarge { size: usize, max: usize },

    /// A code byte is zero
    #[error("invalid COBS: zero byte in code position at offset {offset}")]
    ZeroCode { offset: usize },

    /// A zero byte appears inside a data block
    #[error("invalid COBS: zero byte in data at offset {offset}")]
    UnexpectedZero { offset: usize },

    /// A block's declared length runs past the end of input
    #[error("invalid COBS: block at offset {offset} runs past end of data")]
    Truncated { offset: usize },

    /// Frame is empty or does not end with the delimiter
    #[error("no COBS delimiter found")]
    MissingDelimiter,

    /// Caller-supplied output buffer cannot hold the result
    #[error("output buffer too small")]
    BufferTooSmall,
}

/// Errors from the message layer and typed payload structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Fewer bytes than the 2-byte header
    #[error("message too short: {len} bytes")]
    TooShort { len: usize },

    /// Declared payload length exceeds the bytes available
    #[error("payload truncated: expected {declared}, got {available}")]
    Truncated { declared: usize, available: usize },

    /// Payload exceeds the protocol maximum
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Bytes follow the declared payload (strict unpacking only)
    #[error("{extra} trailing bytes after payload")]
    TrailingBytes { extra: usize },

    /// Payload shorter than the fixed width of the structure
    #[error("payload too short for {name}: expected {expected}, got {actual}")]
    PayloadTooShort {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Response status byte outside the status set
    #[error("unknown response status {0:#04x}")]
    UnknownStatus(u8),

    /// Parameter id outside the parameter set
    #[error("unknown parameter id {0:#04x}")]
    UnknownParam(u8),

    /// Request id not in the message catalog
    #[error("unknown message id {0:#04x}")]
    UnknownMessageId(u8),

    /// Error-flag bits outside the defined flags
    #[error("unknown error flags {0:#06x}")]
    UnknownErrorFlags(u16),

    /// Enumerated field (stop mode, home direction, jog direction) out of range
    #[error("invalid value {value:#04x} for {field}")]
    InvalidField { field: &'static str, value: u8 },

    /// A response id was given where a request was expected
    #[error("message {0:#04x} is a response, not a request")]
    NotARequest(u8),
}

impl MessageError {
    /// Returns true for values outside a closed enumeration.
    ///
    /// These are structurally sound messages that this side of the link does
    /// not recognise, so callers may choose to treat them as a
    /// forward-compatibility case instead of a hard failure.
    pub fn is_unknown_value(&self) -> bool {
        matches!(
            self,
            MessageError::UnknownStatus(_)
                | MessageError::UnknownParam(_)
                | MessageError::UnknownMessageId(_)
                | MessageError::UnknownErrorFlags(_)
                | MessageError::InvalidField { .. }
        )
    }
}

/// Errors from the end-to-end frame pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    #[error(transparent)]
    Cobs(#[from] CobsError),

    #[error(transparent)]
    Crc(#[from] CrcError),

    #[error(transparent)]
    Message(#[from] MessageError),

    /// Stream produced more bytes than a frame can hold before a delimiter
    #[error("frame overflow: more than {max} bytes without delimiter")]
    Overflow { max: usize },
}

impl FrameError {
    /// The frame is incomplete; the caller should keep buffering.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, FrameError::Cobs(CobsError::MissingDelimiter))
    }

    /// The bytes were damaged in transit, mis-framed or oversized; discard
    /// and resync on the next delimiter.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FrameError::Cobs(
                CobsError::InputTooLarge { .. }
                    | CobsError::ZeroCode { .. }
                    | CobsError::UnexpectedZero { .. }
                    | CobsError::Truncated { .. }
            ) | FrameError::Crc(CrcError::Mismatch { .. })
                | FrameError::Overflow { .. }
        )
    }
}

#[cfg(feature = "std")]
impl From<FrameError> for std::io::Error {
    fn from(err: FrameError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err)
    }
}
