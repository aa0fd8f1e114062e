use lenscast_core::ParticipantId;
use serde::Serialize;

/// What the page shows for this client's link to the sharer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum LinkStatus {
    Idle,
    Connecting,
    WaitingForSharer,
    Negotiating,
    Connected,
    Sharing,
    Lost { reason: String },
    Disconnected,
}

/// Events handed to the application callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    Registered {
        id: ParticipantId,
    },
    Status {
        status: LinkStatus,
    },
    #[serde(rename_all = "camelCase")]
    Reconnecting {
        attempt: u32,
        delay_ms: u64,
    },
    RemoteMedia,
    SessionError {
        reason: String,
    },
    ConnectionFailed {
        reason: String,
    },
}
