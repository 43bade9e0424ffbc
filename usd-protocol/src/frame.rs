//! Frame encoding and decoding
//!
//! Frame format on the wire:
//! - COBS(MSG_ID, LENGTH, PAYLOAD, CRC_LO, CRC_HI)
//! - DELIMITER (1 byte): 0x00
//!
//! The CRC covers the header and payload. Because the whole checked unit
//! must fit the COBS input limit, a framed payload is at most
//! [`MAX_FRAMED_PAYLOAD_SIZE`] bytes.

use heapless::Vec;

use crate::cobs::{self, COBS_DELIMITER, COBS_MAX_INPUT_SIZE, COBS_MAX_OUTPUT_SIZE};
use crate::config::{DecoderConfig, TrailingData};
use crate::crc16::{self, CRC16_SIZE};
use crate::error::{FrameError, MessageError};
use crate::message::{Message, MSG_HEADER_SIZE};

/// Largest payload that fits in a single frame
pub const MAX_FRAMED_PAYLOAD_SIZE: usize = COBS_MAX_INPUT_SIZE - MSG_HEADER_SIZE - CRC16_SIZE;

/// Largest frame on the wire, delimiter included
pub const MAX_FRAME_SIZE: usize = COBS_MAX_OUTPUT_SIZE + 1;

/// Encoded frame storage
pub type FrameBuf = Vec<u8, MAX_FRAME_SIZE>;

/// Encode a message into a delimiter-terminated frame
pub fn encode_frame(message: &Message) -> Result<FrameBuf, FrameError> {
    if message.payload.len() > MAX_FRAMED_PAYLOAD_SIZE {
        return Err(MessageError::PayloadTooLarge {
            size: message.payload.len(),
            max: MAX_FRAMED_PAYLOAD_SIZE,
        }
        .into());
    }

    let checked = crc16::append(&message.pack())?;
    let frame = cobs::frame(&checked)?;
    trace!(
        "encoded frame: msg_id={} payload={} wire={}",
        message.msg_id,
        message.payload.len(),
        frame.len()
    );
    Ok(frame)
}

/// Decode a single delimiter-terminated frame
///
/// Bytes after the declared payload are ignored.
pub fn decode_frame(frame: &[u8]) -> Result<Message, FrameError> {
    decode_frame_with(frame, &DecoderConfig::default())
}

/// Decode a single delimiter-terminated frame with explicit options
pub fn decode_frame_with(frame: &[u8], config: &DecoderConfig) -> Result<Message, FrameError> {
    let decoded = cobs::unframe(frame)?;
    decode_checked(&decoded, config)
}

/// Verify and strip the CRC, then unpack the message
fn decode_checked(decoded: &[u8], config: &DecoderConfig) -> Result<Message, FrameError> {
    let data = crc16::check_and_strip(decoded)?;
    let message = match config.trailing_data {
        TrailingData::Ignore => Message::unpack(data)?,
        TrailingData::Reject => Message::unpack_strict(data)?,
    };
    Ok(message)
}

/// Incremental decoder for a continuous byte stream
///
/// Bytes are buffered until a delimiter arrives, then the buffered frame is
/// decoded. A bad frame is reported and dropped; decoding continues with the
/// next frame.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    buffer: Vec<u8, COBS_MAX_OUTPUT_SIZE>,
    discarding: bool,
    config: DecoderConfig,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            config,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Number of bytes waiting for a delimiter
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(message))` when a delimiter completes a valid frame,
    /// `Ok(None)` when more bytes are needed, or `Err` when the completed
    /// frame is bad. An overflowing frame is reported once and the rest of it
    /// is skipped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Message>, FrameError> {
        if byte == COBS_DELIMITER {
            return self.end_frame();
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            warn!(
                "frame exceeds {} bytes, discarding until delimiter",
                COBS_MAX_OUTPUT_SIZE
            );
            self.buffer.clear();
            self.discarding = true;
            return Err(FrameError::Overflow {
                max: COBS_MAX_OUTPUT_SIZE,
            });
        }

        Ok(None)
    }

    /// Feed multiple bytes to the decoder
    ///
    /// `on_frame` is called for every completed frame, good or bad, in
    /// stream order. Partial frames stay buffered for the next call.
    pub fn feed_bytes<F>(&mut self, bytes: &[u8], mut on_frame: F)
    where
        F: FnMut(Result<Message, FrameError>),
    {
        for &byte in bytes {
            match self.feed(byte) {
                Ok(Some(message)) => on_frame(Ok(message)),
                Ok(None) => {}
                Err(err) => on_frame(Err(err)),
            }
        }
    }

    fn end_frame(&mut self) -> Result<Option<Message>, FrameError> {
        if self.discarding {
            debug!("resynchronized on delimiter");
            self.discarding = false;
            return Ok(None);
        }

        // Idle line or back-to-back delimiters
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let result = cobs::decode(&self.buffer)
            .map_err(FrameError::from)
            .and_then(|decoded| decode_checked(&decoded, &self.config));
        self.buffer.clear();

        match result {
            Ok(message) => {
                debug!(
                    "decoded frame: msg_id={} payload={}",
                    message.msg_id,
                    message.payload.len()
                );
                Ok(Some(message))
            }
            Err(err) => {
                warn!("discarding frame: {}", err);
                Err(err)
            }
        }
    }
}
