use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EnvelopeError;
use crate::model::{IceCandidate, IceTarget, ParticipantId, Role, SessionDescription};

/// One signaling frame. Every frame on the socket is a JSON object tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Envelope {
    Register {
        role: Role,
    },
    #[serde(rename_all = "camelCase")]
    Registered {
        id: ParticipantId,
        /// Only present in replies to watchers.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sharer_available: Option<bool>,
    },
    SharerConnected,
    SharerDisconnected,
    Offer {
        offer: SessionDescription,
    },
    Answer {
        answer: SessionDescription,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<ParticipantId>,
    },
    IceCandidate {
        candidate: IceCandidate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<IceTarget>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<ParticipantId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<ParticipantId>,
    },
    Heartbeat,
    HeartbeatAck,
}

impl Envelope {
    pub const KINDS: [&'static str; 9] = [
        "register",
        "registered",
        "sharer-connected",
        "sharer-disconnected",
        "offer",
        "answer",
        "ice-candidate",
        "heartbeat",
        "heartbeat-ack",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Register { .. } => "register",
            Envelope::Registered { .. } => "registered",
            Envelope::SharerConnected => "sharer-connected",
            Envelope::SharerDisconnected => "sharer-disconnected",
            Envelope::Offer { .. } => "offer",
            Envelope::Answer { .. } => "answer",
            Envelope::IceCandidate { .. } => "ice-candidate",
            Envelope::Heartbeat => "heartbeat",
            Envelope::HeartbeatAck => "heartbeat-ack",
        }
    }

    /// Parses a text frame, telling unknown tags apart from broken payloads.
    pub fn decode(text: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(EnvelopeError::MissingType)?;

        if !Self::KINDS.contains(&kind) {
            return Err(EnvelopeError::UnknownType(kind.to_owned()));
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn encode(&self) -> Result<String, EnvelopeError> {
        Ok(serde_json::to_string(self)?)
    }
}
