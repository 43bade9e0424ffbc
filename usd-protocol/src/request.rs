//! Typed requests
//!
//! Host-to-node commands decoded from a [`Message`]. Requests with no
//! payload ignore any bytes the sender attached.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MessageError;
use crate::ids::{ConfigMsgId, MotionMsgId, MsgId, SystemMsgId, TelemetryMsgId};
use crate::message::Message;
use crate::payload::{
    GetParamCommand, HomeCommand, JogCommand, MoveToCommand, MoveVelocityCommand, Packable,
    SetNodeIdCommand, SetParamCommand, SetPositionCommand, StopCommand,
};

/// Request sent from the host to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Request {
    // System
    Ping,
    Version,
    Reset,
    Status,
    NodeInfo,
    SetNodeId(SetNodeIdCommand),

    // Motion
    MoveTo(MoveToCommand),
    MoveVelocity(MoveVelocityCommand),
    Stop(StopCommand),
    Home(HomeCommand),
    SetPosition(SetPositionCommand),
    Jog(JogCommand),
    SyncMove,

    // Config
    GetParam(GetParamCommand),
    SetParam(SetParamCommand),
    SaveConfig,
    LoadConfig,
    ResetConfig,

    // Telemetry
    GetPosition,
    GetVelocity,
    GetTemp,
    GetError,
    StreamStart,
    StreamStop,
}

impl Request {
    /// Catalog id of this request
    pub fn msg_id(&self) -> MsgId {
        match self {
            Request::Ping => SystemMsgId::Ping.into(),
            Request::Version => SystemMsgId::Version.into(),
            Request::Reset => SystemMsgId::Reset.into(),
            Request::Status => SystemMsgId::Status.into(),
            Request::NodeInfo => SystemMsgId::NodeInfo.into(),
            Request::SetNodeId(_) => SystemMsgId::SetNodeId.into(),
            Request::MoveTo(_) => MotionMsgId::MoveTo.into(),
            Request::MoveVelocity(_) => MotionMsgId::MoveVelocity.into(),
            Request::Stop(_) => MotionMsgId::Stop.into(),
            Request::Home(_) => MotionMsgId::Home.into(),
            Request::SetPosition(_) => MotionMsgId::SetPosition.into(),
            Request::Jog(_) => MotionMsgId::Jog.into(),
            Request::SyncMove => MotionMsgId::SyncMove.into(),
            Request::GetParam(_) => ConfigMsgId::GetParam.into(),
            Request::SetParam(_) => ConfigMsgId::SetParam.into(),
            Request::SaveConfig => ConfigMsgId::SaveConfig.into(),
            Request::LoadConfig => ConfigMsgId::LoadConfig.into(),
            Request::ResetConfig => ConfigMsgId::ResetConfig.into(),
            Request::GetPosition => TelemetryMsgId::GetPosition.into(),
            Request::GetVelocity => TelemetryMsgId::GetVelocity.into(),
            Request::GetTemp => TelemetryMsgId::GetTemp.into(),
            Request::GetError => TelemetryMsgId::GetError.into(),
            Request::StreamStart => TelemetryMsgId::StreamStart.into(),
            Request::StreamStop => TelemetryMsgId::StreamStop.into(),
        }
    }

    /// Build the wire message for this request
    pub fn to_message(&self) -> Message {
        let msg_id = self.msg_id().to_byte();
        match self {
            Request::SetNodeId(cmd) => cmd.to_message(msg_id),
            Request::MoveTo(cmd) => cmd.to_message(msg_id),
            Request::MoveVelocity(cmd) => cmd.to_message(msg_id),
            Request::Stop(cmd) => cmd.to_message(msg_id),
            Request::Home(cmd) => cmd.to_message(msg_id),
            Request::SetPosition(cmd) => cmd.to_message(msg_id),
            Request::Jog(cmd) => cmd.to_message(msg_id),
            Request::GetParam(cmd) => cmd.to_message(msg_id),
            Request::SetParam(cmd) => cmd.to_message(msg_id),
            _ => Message::empty(msg_id),
        }
    }

    /// Parse a request from a message
    pub fn from_message(message: &Message) -> Result<Self, MessageError> {
        if message.is_response() {
            return Err(MessageError::NotARequest(message.msg_id));
        }

        let id = message
            .catalog_id()
            .ok_or(MessageError::UnknownMessageId(message.msg_id))?;
        let payload = message.payload.as_slice();

        let request = match id {
            MsgId::System(id) => match id {
                SystemMsgId::Ping => Request::Ping,
                SystemMsgId::Version => Request::Version,
                SystemMsgId::Reset => Request::Reset,
                SystemMsgId::Status => Request::Status,
                SystemMsgId::NodeInfo => Request::NodeInfo,
                SystemMsgId::SetNodeId => Request::SetNodeId(SetNodeIdCommand::unpack(payload)?),
            },
            MsgId::Motion(id) => match id {
                MotionMsgId::MoveTo => Request::MoveTo(MoveToCommand::unpack(payload)?),
                MotionMsgId::MoveVelocity => {
                    Request::MoveVelocity(MoveVelocityCommand::unpack(payload)?)
                }
                MotionMsgId::Stop => Request::Stop(StopCommand::unpack(payload)?),
                MotionMsgId::Home => Request::Home(HomeCommand::unpack(payload)?),
                MotionMsgId::SetPosition => {
                    Request::SetPosition(SetPositionCommand::unpack(payload)?)
                }
                MotionMsgId::Jog => Request::Jog(JogCommand::unpack(payload)?),
                MotionMsgId::SyncMove => Request::SyncMove,
            },
            MsgId::Config(id) => match id {
                ConfigMsgId::GetParam => Request::GetParam(GetParamCommand::unpack(payload)?),
                ConfigMsgId::SetParam => Request::SetParam(SetParamCommand::unpack(payload)?),
                ConfigMsgId::SaveConfig => Request::SaveConfig,
                ConfigMsgId::LoadConfig => Request::LoadConfig,
                ConfigMsgId::ResetConfig => Request::ResetConfig,
            },
            MsgId::Telemetry(id) => match id {
                TelemetryMsgId::GetPosition => Request::GetPosition,
                TelemetryMsgId::GetVelocity => Request::GetVelocity,
                TelemetryMsgId::GetTemp => Request::GetTemp,
                TelemetryMsgId::GetError => Request::GetError,
                TelemetryMsgId::StreamStart => Request::StreamStart,
                TelemetryMsgId::StreamStop => Request::StreamStop,
            },
        };

        Ok(request)
    }
}
