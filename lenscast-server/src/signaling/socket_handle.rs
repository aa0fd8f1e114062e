use axum::extract::ws::Message;
use lenscast_core::Envelope;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, warn};

/// Frames a participant's writer may lag behind before further frames are dropped.
pub const SOCKET_QUEUE_DEPTH: usize = 64;

/// Write half of one participant's WebSocket, as seen by the coordinator.
///
/// The socket counts as open for as long as its writer task still holds the
/// receiving end of the channel.
#[derive(Debug, Clone)]
pub struct SocketHandle {
    tx: mpsc::Sender<Message>,
}

impl SocketHandle {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }

    /// A handle plus the queue its writer task drains.
    pub fn channel() -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(SOCKET_QUEUE_DEPTH);
        (Self::new(tx), rx)
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Returns `false` when the frame could not be handed to the writer,
    /// including when its queue is full.
    pub fn send(&self, envelope: &Envelope) -> bool {
        if !self.is_open() {
            return false;
        }

        let json = match envelope.encode() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {} envelope: {}", envelope.kind(), e);
                return false;
            }
        };

        match self.tx.try_send(Message::Text(json.into())) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Writer queue full, dropping {}", envelope.kind());
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}
