use crate::signaling::SocketHandle;
use lenscast_core::{ParticipantId, StatusReport};
use tokio::sync::oneshot;

/// Commands the WebSocket layer feeds into the coordinator.
#[derive(Debug)]
pub enum CoordinatorCommand {
    /// A socket was accepted and given an id; nothing is registered yet.
    Connect {
        participant_id: ParticipantId,
        socket: SocketHandle,
    },

    /// A text frame arrived on that participant's socket.
    Frame {
        participant_id: ParticipantId,
        text: String,
    },

    /// The socket closed or errored.
    Disconnect { participant_id: ParticipantId },

    Status {
        respond_to: oneshot::Sender<StatusReport>,
    },
}
