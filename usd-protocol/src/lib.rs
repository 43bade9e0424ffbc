//! USD Wire Protocol
//!
//! This crate defines the serial protocol between host software and a USD
//! (Ultimate Stepper Driver) motion-control node. The same byte format is
//! implemented by the node firmware, so every layout here is fixed.
//!
//! # Protocol Overview
//!
//! A message is packed, checksummed, COBS-encoded and delimited:
//! ```text
//! ┌────────┬────────┬─────────────┬──────────┐
//! │ MSG_ID │ LENGTH │ PAYLOAD     │ CRC16 LE │   ──COBS──▶  ... │ 0x00 │
//! │ 1B     │ 1B     │ 0–246B      │ 2B       │
//! └────────┴────────┴─────────────┴──────────┘
//! ```
//!
//! Responses reuse the request id with bit 0x80 set. The delimiter is the
//! only zero byte on the wire, so a receiver can always resynchronize on the
//! next 0x00 after a damaged frame.
//!
//! ```
//! use usd_protocol::{decode_frame, encode_frame, MoveToCommand, Request};
//!
//! let request = Request::MoveTo(MoveToCommand {
//!     position: 1000,
//!     velocity: 100,
//!     acceleration: 50,
//! });
//! let frame = encode_frame(&request.to_message()).unwrap();
//!
//! let message = decode_frame(&frame).unwrap();
//! assert_eq!(Request::from_message(&message), Ok(request));
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod cobs;
pub mod config;
pub mod crc16;
pub mod error;
pub mod frame;
pub mod ids;
pub mod message;
pub mod payload;
pub mod request;

pub use config::{DecoderConfig, TrailingData};
pub use error::{CobsError, CrcError, FrameError, MessageError};
pub use frame::{
    decode_frame, decode_frame_with, encode_frame, FrameBuf, FrameDecoder,
    MAX_FRAMED_PAYLOAD_SIZE, MAX_FRAME_SIZE,
};
pub use ids::{
    ConfigMsgId, ErrorFlags, MotionMsgId, MsgGroup, MsgId, ParamId, ParamKind, ResponseStatus,
    SystemMsgId, TelemetryMsgId, MSG_ID_RESPONSE_BIT,
};
pub use message::{Message, Payload, MAX_PAYLOAD_SIZE, MSG_HEADER_SIZE};
pub use payload::{
    ErrorFlagsResponse, GetParamCommand, HomeCommand, HomeDirection, JogCommand, MoveToCommand,
    MoveVelocityCommand, Packable, ParamResponse, PingResponse, PositionResponse,
    SetNodeIdCommand, SetParamCommand, SetPositionCommand, StatusResponse, StopCommand, StopMode,
    VersionResponse,
};
pub use request::Request;

/// CRC size on the wire
pub const MSG_CRC_SIZE: usize = crc16::CRC16_SIZE;

/// Largest checksum-protected unit: header + payload + CRC
pub const MSG_MAX_SIZE: usize = MSG_HEADER_SIZE + MAX_PAYLOAD_SIZE + MSG_CRC_SIZE;
