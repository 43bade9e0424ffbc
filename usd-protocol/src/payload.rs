//! Typed payload structures
//!
//! Every structure has a fixed little-endian layout. `unpack` reads the first
//! [`Packable::SIZE`] bytes and ignores anything after them. Velocity and
//! acceleration fields are the raw scaled integers sent on the wire
//! (steps/sec / 10, steps/sec^2 / 100); scaling belongs to the caller.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MessageError;
use crate::ids::{ErrorFlags, ParamId, ParamKind, ResponseStatus};
use crate::message::{Message, Payload};

/// Fixed-layout payload that packs to and from raw bytes
pub trait Packable: Sized {
    /// Packed size in bytes
    const SIZE: usize;

    /// Name used in error reports
    const NAME: &'static str;

    /// Write exactly [`Self::SIZE`] bytes into `out`
    ///
    /// `out` is at least `SIZE` bytes long.
    fn write(&self, out: &mut [u8]);

    /// Read from the first [`Self::SIZE`] bytes of `data`
    ///
    /// `data` is at least `SIZE` bytes long.
    fn read(data: &[u8]) -> Result<Self, MessageError>;

    /// Pack into payload bytes
    fn pack(&self) -> Payload {
        let mut buffer = [0u8; crate::MAX_PAYLOAD_SIZE];
        self.write(&mut buffer[..Self::SIZE]);
        let mut payload = Payload::new();
        // SIZE never exceeds the payload capacity
        let _ = payload.extend_from_slice(&buffer[..Self::SIZE]);
        payload
    }

    /// Unpack from payload bytes, ignoring any extra bytes
    fn unpack(data: &[u8]) -> Result<Self, MessageError> {
        if data.len() < Self::SIZE {
            return Err(MessageError::PayloadTooShort {
                name: Self::NAME,
                expected: Self::SIZE,
                actual: data.len(),
            });
        }
        Self::read(&data[..Self::SIZE])
    }

    /// Wrap into a message with the given id
    fn to_message(&self, msg_id: u8) -> Message {
        Message {
            msg_id,
            payload: self.pack(),
        }
    }

    /// Wrap into the response to `request_id`
    fn to_response(&self, request_id: u8) -> Message {
        self.to_message(request_id | crate::ids::MSG_ID_RESPONSE_BIT)
    }

    /// Unpack from a message payload
    fn from_message(message: &Message) -> Result<Self, MessageError> {
        Self::unpack(&message.payload)
    }
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_i16(data: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Move to absolute position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveToCommand {
    /// Target position (steps)
    pub position: i32,
    /// Velocity (steps/sec / 10)
    pub velocity: u16,
    /// Acceleration (steps/sec^2 / 100), 0 for the node default
    pub acceleration: u16,
}

impl Packable for MoveToCommand {
    const SIZE: usize = 8;
    const NAME: &'static str = "MoveToCommand";

    fn write(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.position.to_le_bytes());
        out[4..6].copy_from_slice(&self.velocity.to_le_bytes());
        out[6..8].copy_from_slice(&self.acceleration.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            position: read_i32(data, 0),
            velocity: read_u16(data, 4),
            acceleration: read_u16(data, 6),
        })
    }
}

/// Run at constant velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveVelocityCommand {
    /// Signed velocity (steps/sec / 10)
    pub velocity: i16,
}

impl Packable for MoveVelocityCommand {
    const SIZE: usize = 2;
    const NAME: &'static str = "MoveVelocityCommand";

    fn write(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.velocity.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            velocity: read_i16(data, 0),
        })
    }
}

/// How a stop is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopMode {
    /// Ramp down with the configured deceleration
    #[default]
    Decelerate,
    /// Stop stepping now
    Immediate,
}

impl StopMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(StopMode::Decelerate),
            1 => Some(StopMode::Immediate),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            StopMode::Decelerate => 0,
            StopMode::Immediate => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StopCommand {
    pub mode: StopMode,
}

impl Packable for StopCommand {
    const SIZE: usize = 1;
    const NAME: &'static str = "StopCommand";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.mode.to_byte();
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        let mode = StopMode::from_byte(data[0]).ok_or(MessageError::InvalidField {
            field: "stop mode",
            value: data[0],
        })?;
        Ok(Self { mode })
    }
}

/// Homing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HomeDirection {
    #[default]
    Negative,
    Positive,
}

impl HomeDirection {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(HomeDirection::Negative),
            1 => Some(HomeDirection::Positive),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            HomeDirection::Negative => 0,
            HomeDirection::Positive => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomeCommand {
    pub direction: HomeDirection,
    /// Homing velocity (steps/sec / 10)
    pub velocity: u16,
}

impl Packable for HomeCommand {
    const SIZE: usize = 3;
    const NAME: &'static str = "HomeCommand";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.direction.to_byte();
        out[1..3].copy_from_slice(&self.velocity.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        let direction = HomeDirection::from_byte(data[0]).ok_or(MessageError::InvalidField {
            field: "home direction",
            value: data[0],
        })?;
        Ok(Self {
            direction,
            velocity: read_u16(data, 1),
        })
    }
}

/// Overwrite the current position counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetPositionCommand {
    pub position: i32,
}

impl Packable for SetPositionCommand {
    const SIZE: usize = 4;
    const NAME: &'static str = "SetPositionCommand";

    fn write(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.position.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            position: read_i32(data, 0),
        })
    }
}

/// Jog while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JogCommand {
    /// -1 (reverse), 0 (stop) or +1 (forward)
    pub direction: i8,
    /// Jog velocity (steps/sec / 10)
    pub velocity: u16,
}

impl Packable for JogCommand {
    const SIZE: usize = 3;
    const NAME: &'static str = "JogCommand";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.direction.to_le_bytes()[0];
        out[1..3].copy_from_slice(&self.velocity.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        let direction = i8::from_le_bytes([data[0]]);
        if !(-1..=1).contains(&direction) {
            return Err(MessageError::InvalidField {
                field: "jog direction",
                value: data[0],
            });
        }
        Ok(Self {
            direction,
            velocity: read_u16(data, 1),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetNodeIdCommand {
    pub node_id: u8,
}

impl Packable for SetNodeIdCommand {
    const SIZE: usize = 1;
    const NAME: &'static str = "SetNodeIdCommand";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.node_id;
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self { node_id: data[0] })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GetParamCommand {
    pub param: ParamId,
}

impl Packable for GetParamCommand {
    const SIZE: usize = 1;
    const NAME: &'static str = "GetParamCommand";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.param.to_byte();
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            param: ParamId::parse(data[0])?,
        })
    }
}

/// Set a parameter
///
/// The value always occupies 4 bytes. Use [`SetParamCommand::from_f32`] for
/// PID gains so the IEEE-754 bits are carried unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetParamCommand {
    pub param: ParamId,
    pub value: u32,
}

impl SetParamCommand {
    pub fn new(param: ParamId, value: u32) -> Self {
        Self { param, value }
    }

    pub fn from_f32(param: ParamId, value: f32) -> Self {
        Self {
            param,
            value: value.to_bits(),
        }
    }

    /// Value reinterpreted as `f32`; only meaningful for [`ParamKind::F32`]
    pub fn value_f32(&self) -> f32 {
        f32::from_bits(self.value)
    }
}

impl Packable for SetParamCommand {
    const SIZE: usize = 5;
    const NAME: &'static str = "SetParamCommand";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.param.to_byte();
        out[1..5].copy_from_slice(&self.value.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            param: ParamId::parse(data[0])?,
            value: read_u32(data, 1),
        })
    }
}

/// Ping reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PingResponse {
    pub status: ResponseStatus,
    pub node_id: u8,
}

impl Packable for PingResponse {
    const SIZE: usize = 2;
    const NAME: &'static str = "PingResponse";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.status.to_byte();
        out[1] = self.node_id;
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            status: ResponseStatus::parse(data[0])?,
            node_id: data[1],
        })
    }
}

/// Firmware version reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VersionResponse {
    pub status: ResponseStatus,
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Packable for VersionResponse {
    const SIZE: usize = 4;
    const NAME: &'static str = "VersionResponse";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.status.to_byte();
        out[1] = self.major;
        out[2] = self.minor;
        out[3] = self.patch;
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            status: ResponseStatus::parse(data[0])?,
            major: data[1],
            minor: data[2],
            patch: data[3],
        })
    }
}

impl core::fmt::Display for VersionResponse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Position telemetry reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionResponse {
    pub status: ResponseStatus,
    /// Current position (steps)
    pub position: i32,
    /// Current velocity (steps/sec / 10)
    pub velocity: i16,
}

impl Packable for PositionResponse {
    const SIZE: usize = 7;
    const NAME: &'static str = "PositionResponse";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.status.to_byte();
        out[1..5].copy_from_slice(&self.position.to_le_bytes());
        out[5..7].copy_from_slice(&self.velocity.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            status: ResponseStatus::parse(data[0])?,
            position: read_i32(data, 1),
            velocity: read_i16(data, 5),
        })
    }
}

/// Bare acknowledgement carrying only a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusResponse {
    pub status: ResponseStatus,
}

impl Packable for StatusResponse {
    const SIZE: usize = 1;
    const NAME: &'static str = "StatusResponse";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.status.to_byte();
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            status: ResponseStatus::parse(data[0])?,
        })
    }
}

/// GET_PARAM reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamResponse {
    pub status: ResponseStatus,
    pub param: ParamId,
    pub value: u32,
}

impl ParamResponse {
    /// Value reinterpreted as `f32`; only meaningful for [`ParamKind::F32`]
    pub fn value_f32(&self) -> f32 {
        f32::from_bits(self.value)
    }

    /// Returns true if `value` fits the parameter's native width
    pub fn value_in_range(&self) -> bool {
        match self.param.kind() {
            ParamKind::U8 => self.value <= u32::from(u8::MAX),
            ParamKind::U16 => self.value <= u32::from(u16::MAX),
            ParamKind::U32 | ParamKind::F32 => true,
        }
    }
}

impl Packable for ParamResponse {
    const SIZE: usize = 6;
    const NAME: &'static str = "ParamResponse";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.status.to_byte();
        out[1] = self.param.to_byte();
        out[2..6].copy_from_slice(&self.value.to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            status: ResponseStatus::parse(data[0])?,
            param: ParamId::parse(data[1])?,
            value: read_u32(data, 2),
        })
    }
}

/// GET_ERROR reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorFlagsResponse {
    pub status: ResponseStatus,
    pub flags: ErrorFlags,
}

impl Packable for ErrorFlagsResponse {
    const SIZE: usize = 3;
    const NAME: &'static str = "ErrorFlagsResponse";

    fn write(&self, out: &mut [u8]) {
        out[0] = self.status.to_byte();
        out[1..3].copy_from_slice(&self.flags.bits().to_le_bytes());
    }

    fn read(data: &[u8]) -> Result<Self, MessageError> {
        Ok(Self {
            status: ResponseStatus::parse(data[0])?,
            flags: ErrorFlags::from_bits(read_u16(data, 1))?,
        })
    }
}
