//! Message catalog and shared enumerations
//!
//! These values are shared byte-for-byte with the node firmware and must not
//! be renumbered on one side only.
//!
//! Request id ranges:
//! - `0x00-0x0F` system
//! - `0x10-0x2F` motion
//! - `0x30-0x3F` configuration
//! - `0x40-0x4F` telemetry
//!
//! Responses set [`MSG_ID_RESPONSE_BIT`] on the id of the request they answer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MessageError;

/// OR'd onto a request id to form the id of its response
pub const MSG_ID_RESPONSE_BIT: u8 = 0x80;

pub const MSG_ID_SYSTEM_MIN: u8 = 0x00;
pub const MSG_ID_SYSTEM_MAX: u8 = 0x0F;
pub const MSG_ID_MOTION_MIN: u8 = 0x10;
pub const MSG_ID_MOTION_MAX: u8 = 0x2F;
pub const MSG_ID_CONFIG_MIN: u8 = 0x30;
pub const MSG_ID_CONFIG_MAX: u8 = 0x3F;
pub const MSG_ID_TELEMETRY_MIN: u8 = 0x40;
pub const MSG_ID_TELEMETRY_MAX: u8 = 0x4F;

/// Subsystem a request id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MsgGroup {
    System,
    Motion,
    Config,
    Telemetry,
}

impl MsgGroup {
    /// Classify a request id by range
    ///
    /// The response bit is ignored. Returns `None` for the unassigned range
    /// `0x50-0x7F`.
    pub fn of(msg_id: u8) -> Option<Self> {
        match msg_id & !MSG_ID_RESPONSE_BIT {
            MSG_ID_SYSTEM_MIN..=MSG_ID_SYSTEM_MAX => Some(MsgGroup::System),
            MSG_ID_MOTION_MIN..=MSG_ID_MOTION_MAX => Some(MsgGroup::Motion),
            MSG_ID_CONFIG_MIN..=MSG_ID_CONFIG_MAX => Some(MsgGroup::Config),
            MSG_ID_TELEMETRY_MIN..=MSG_ID_TELEMETRY_MAX => Some(MsgGroup::Telemetry),
            _ => None,
        }
    }
}

/// Declares a closed `u8` enumeration with `from_byte` / `to_byte`
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// All members in wire order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Parse from the wire byte
            pub fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Wire byte
            pub fn to_byte(self) -> u8 {
                self as u8
            }
        }
    };
}

wire_enum! {
    /// System message ids (0x00-0x0F)
    pub enum SystemMsgId {
        /// Ping (payload: none)
        Ping = 0x00,
        /// Get firmware version (payload: none)
        Version = 0x01,
        /// Reset MCU (payload: none)
        Reset = 0x02,
        /// Get system status
        Status = 0x03,
        /// Get node info (multi-MCU)
        NodeInfo = 0x04,
        /// Set node id (payload: u8 node_id)
        SetNodeId = 0x05,
    }
}

wire_enum! {
    /// Motion message ids (0x10-0x2F)
    pub enum MotionMsgId {
        /// Move to position (payload: i32 position, u16 velocity, u16 accel)
        MoveTo = 0x10,
        /// Move at velocity (payload: i16 velocity)
        MoveVelocity = 0x11,
        /// Stop motion (payload: u8 mode)
        Stop = 0x12,
        /// Home axis (payload: u8 direction, u16 velocity)
        Home = 0x13,
        /// Set current position (payload: i32 position)
        SetPosition = 0x14,
        /// Jog (payload: i8 direction, u16 velocity)
        Jog = 0x15,
        /// Synchronized move start (multi-MCU)
        SyncMove = 0x16,
    }
}

wire_enum! {
    /// Configuration message ids (0x30-0x3F)
    pub enum ConfigMsgId {
        /// Get parameter (payload: u8 param_id)
        GetParam = 0x30,
        /// Set parameter (payload: u8 param_id, u32 value)
        SetParam = 0x31,
        /// Save config to flash
        SaveConfig = 0x32,
        /// Load config from flash
        LoadConfig = 0x33,
        /// Reset to defaults
        ResetConfig = 0x34,
    }
}

wire_enum! {
    /// Telemetry message ids (0x40-0x4F)
    pub enum TelemetryMsgId {
        GetPosition = 0x40,
        GetVelocity = 0x41,
        GetTemp = 0x42,
        GetError = 0x43,
        StreamStart = 0x44,
        StreamStop = 0x45,
    }
}

/// Any request id defined by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MsgId {
    System(SystemMsgId),
    Motion(MotionMsgId),
    Config(ConfigMsgId),
    Telemetry(TelemetryMsgId),
}

impl MsgId {
    /// Look up a request id
    ///
    /// Ids inside a group range but not assigned in that group are unknown,
    /// as are response ids.
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte & MSG_ID_RESPONSE_BIT != 0 {
            return None;
        }
        match MsgGroup::of(byte)? {
            MsgGroup::System => SystemMsgId::from_byte(byte).map(MsgId::System),
            MsgGroup::Motion => MotionMsgId::from_byte(byte).map(MsgId::Motion),
            MsgGroup::Config => ConfigMsgId::from_byte(byte).map(MsgId::Config),
            MsgGroup::Telemetry => TelemetryMsgId::from_byte(byte).map(MsgId::Telemetry),
        }
    }

    /// Wire byte of the request
    pub fn to_byte(self) -> u8 {
        match self {
            MsgId::System(id) => id.to_byte(),
            MsgId::Motion(id) => id.to_byte(),
            MsgId::Config(id) => id.to_byte(),
            MsgId::Telemetry(id) => id.to_byte(),
        }
    }

    /// Wire byte of the matching response
    pub fn response_byte(self) -> u8 {
        self.to_byte() | MSG_ID_RESPONSE_BIT
    }

    pub fn group(self) -> MsgGroup {
        match self {
            MsgId::System(_) => MsgGroup::System,
            MsgId::Motion(_) => MsgGroup::Motion,
            MsgId::Config(_) => MsgGroup::Config,
            MsgId::Telemetry(_) => MsgGroup::Telemetry,
        }
    }
}

impl From<SystemMsgId> for MsgId {
    fn from(id: SystemMsgId) -> Self {
        MsgId::System(id)
    }
}

impl From<MotionMsgId> for MsgId {
    fn from(id: MotionMsgId) -> Self {
        MsgId::Motion(id)
    }
}

impl From<ConfigMsgId> for MsgId {
    fn from(id: ConfigMsgId) -> Self {
        MsgId::Config(id)
    }
}

impl From<TelemetryMsgId> for MsgId {
    fn from(id: TelemetryMsgId) -> Self {
        MsgId::Telemetry(id)
    }
}

wire_enum! {
    /// Parameter ids for GET_PARAM / SET_PARAM
    pub enum ParamId {
        /// Steps per revolution (u16)
        StepsPerRev = 0x00,
        /// Microstepping divisor (u8)
        Microsteps = 0x01,
        /// Max velocity (u32 steps/sec)
        MaxVelocity = 0x02,
        /// Max acceleration (u32 steps/sec^2)
        MaxAccel = 0x03,
        /// Run current (u8, 0-31)
        CurrentRun = 0x04,
        /// Hold current (u8, 0-31)
        CurrentHold = 0x05,
        /// Position PID Kp (f32)
        PidKp = 0x10,
        /// Position PID Ki (f32)
        PidKi = 0x11,
        /// Position PID Kd (f32)
        PidKd = 0x12,
        /// Encoder counts per revolution (u16)
        EncoderCpr = 0x20,
        /// Node id (u8)
        NodeId = 0x30,
    }
}

/// Native type of a parameter value
///
/// Values always travel in a 4-byte little-endian slot; narrower kinds use
/// the low bytes and `F32` carries the IEEE-754 bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamKind {
    U8,
    U16,
    U32,
    F32,
}

impl ParamId {
    pub fn kind(self) -> ParamKind {
        match self {
            ParamId::Microsteps
            | ParamId::CurrentRun
            | ParamId::CurrentHold
            | ParamId::NodeId => ParamKind::U8,
            ParamId::StepsPerRev | ParamId::EncoderCpr => ParamKind::U16,
            ParamId::MaxVelocity | ParamId::MaxAccel => ParamKind::U32,
            ParamId::PidKp | ParamId::PidKi | ParamId::PidKd => ParamKind::F32,
        }
    }

    /// Parse, reporting unknown ids as [`MessageError::UnknownParam`]
    pub fn parse(byte: u8) -> Result<Self, MessageError> {
        Self::from_byte(byte).ok_or(MessageError::UnknownParam(byte))
    }
}

wire_enum! {
    /// Response status codes
    pub enum ResponseStatus {
        /// Command successful
        Ok = 0x00,
        /// CRC error
        ErrCrc = 0x01,
        /// Unknown command
        ErrCmd = 0x02,
        /// Invalid parameter
        ErrParam = 0x03,
        /// Device busy
        ErrBusy = 0x04,
        /// Fault condition active
        ErrFault = 0x05,
    }
}

impl ResponseStatus {
    pub fn is_ok(self) -> bool {
        self == ResponseStatus::Ok
    }

    /// Parse, reporting unknown codes as [`MessageError::UnknownStatus`]
    pub fn parse(byte: u8) -> Result<Self, MessageError> {
        Self::from_byte(byte).ok_or(MessageError::UnknownStatus(byte))
    }
}

/// Error flags bitfield reported by the node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorFlags(u16);

impl ErrorFlags {
    pub const NONE: Self = Self(0x0000);
    /// CRC check failed
    pub const CRC_FAIL: Self = Self(0x0001);
    /// Unknown command id
    pub const INVALID_CMD: Self = Self(0x0002);
    /// Invalid parameter
    pub const INVALID_PARAM: Self = Self(0x0004);
    /// Over temperature
    pub const OVERTEMP: Self = Self(0x0008);
    /// Over current
    pub const OVERCURRENT: Self = Self(0x0010);
    /// Limit switch triggered
    pub const LIMIT_HIT: Self = Self(0x0020);
    /// Emergency stop active
    pub const ESTOP: Self = Self(0x0040);
    /// Communication timeout
    pub const COMM_TIMEOUT: Self = Self(0x0080);
    /// Encoder read error
    pub const ENCODER_FAULT: Self = Self(0x0100);

    /// Union of every defined flag
    const DEFINED_MASK: u16 = 0x01FF;

    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Build from raw bits, rejecting bits no flag is assigned to
    pub fn from_bits(bits: u16) -> Result<Self, MessageError> {
        if bits & !Self::DEFINED_MASK != 0 {
            return Err(MessageError::UnknownErrorFlags(bits));
        }
        Ok(Self(bits))
    }

    /// Build from raw bits, dropping undefined bits
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::DEFINED_MASK)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl core::ops::BitOr for ErrorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for ErrorFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
