//! Message layer
//!
//! Message format (before CRC and COBS):
//! - MSG_ID (1 byte): request id, or request id | 0x80 for a response
//! - LENGTH (1 byte): payload length (0-250)
//! - PAYLOAD (0-250 bytes): id-specific data

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MessageError;
use crate::ids::{MsgId, MSG_ID_RESPONSE_BIT};

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Header size: MSG_ID (1) + LENGTH (1)
pub const MSG_HEADER_SIZE: usize = 2;

/// Largest packed message (header + payload)
pub const MAX_PACKED_SIZE: usize = MSG_HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Message payload storage
pub type Payload = Vec<u8, MAX_PAYLOAD_SIZE>;

/// Packed message storage
pub type Packed = Vec<u8, MAX_PACKED_SIZE>;

/// A message: id plus payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Message id; bit 0x80 marks a response
    pub msg_id: u8,
    /// Payload data
    pub payload: Payload,
}

impl Message {
    /// Create a message with the given id and payload
    pub fn new(msg_id: u8, payload: &[u8]) -> Result<Self, MessageError> {
        let payload = Vec::from_slice(payload).map_err(|_| MessageError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        })?;
        Ok(Self { msg_id, payload })
    }

    /// Create a message with no payload
    pub fn empty(msg_id: u8) -> Self {
        Self {
            msg_id,
            payload: Vec::new(),
        }
    }

    /// Create a request for a catalog id
    pub fn request(id: impl Into<MsgId>, payload: &[u8]) -> Result<Self, MessageError> {
        Self::new(id.into().to_byte(), payload)
    }

    /// Create the response to `request_id`
    pub fn response(request_id: u8, payload: &[u8]) -> Result<Self, MessageError> {
        Self::new(request_id | MSG_ID_RESPONSE_BIT, payload)
    }

    /// Returns true if this is a response message
    pub fn is_response(&self) -> bool {
        self.msg_id & MSG_ID_RESPONSE_BIT != 0
    }

    /// Id of the request this message answers (or is)
    pub fn request_id(&self) -> u8 {
        self.msg_id & !MSG_ID_RESPONSE_BIT
    }

    /// Catalog entry for the request id, if it is a known one
    pub fn catalog_id(&self) -> Option<MsgId> {
        MsgId::from_byte(self.request_id())
    }

    /// Packed size: header plus payload
    pub fn packed_len(&self) -> usize {
        MSG_HEADER_SIZE + self.payload.len()
    }

    /// Write `[msg_id, length] + payload` into `buffer`
    ///
    /// Returns the number of bytes written
    pub fn pack_into(&self, buffer: &mut [u8]) -> Result<usize, MessageError> {
        let len = self.packed_len();
        if buffer.len() < len {
            return Err(MessageError::PayloadTooLarge {
                size: self.payload.len(),
                max: buffer.len().saturating_sub(MSG_HEADER_SIZE),
            });
        }

        buffer[0] = self.msg_id;
        buffer[1] = self.payload.len() as u8;
        buffer[MSG_HEADER_SIZE..len].copy_from_slice(&self.payload);
        Ok(len)
    }

    /// Pack into `[msg_id, length] + payload`
    pub fn pack(&self) -> Packed {
        let mut packed = Packed::new();
        // Payload capacity guarantees this fits
        let _ = packed.push(self.msg_id);
        let _ = packed.push(self.payload.len() as u8);
        let _ = packed.extend_from_slice(&self.payload);
        packed
    }

    /// Unpack from bytes
    ///
    /// Bytes after the declared payload are ignored.
    pub fn unpack(data: &[u8]) -> Result<Self, MessageError> {
        let (message, _) = Self::unpack_with_rest(data)?;
        Ok(message)
    }

    /// Unpack from bytes, rejecting anything after the declared payload
    pub fn unpack_strict(data: &[u8]) -> Result<Self, MessageError> {
        let (message, rest) = Self::unpack_with_rest(data)?;
        if !rest.is_empty() {
            return Err(MessageError::TrailingBytes { extra: rest.len() });
        }
        Ok(message)
    }

    /// Unpack one message and return the bytes that follow it
    pub fn unpack_with_rest(data: &[u8]) -> Result<(Self, &[u8]), MessageError> {
        if data.len() < MSG_HEADER_SIZE {
            return Err(MessageError::TooShort { len: data.len() });
        }

        let msg_id = data[0];
        let declared = usize::from(data[1]);
        let body = &data[MSG_HEADER_SIZE..];
        if body.len() < declared {
            return Err(MessageError::Truncated {
                declared,
                available: body.len(),
            });
        }

        let (payload, rest) = body.split_at(declared);
        Ok((Self::new(msg_id, payload)?, rest))
    }
}
