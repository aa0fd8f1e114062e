use crate::signaling::SocketHandle;
use lenscast_core::{ParticipantId, Role};

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub role: Role,
    pub socket: SocketHandle,
}

impl Participant {
    pub fn new(id: ParticipantId, role: Role, socket: SocketHandle) -> Self {
        Self { id, role, socket }
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_open()
    }
}
