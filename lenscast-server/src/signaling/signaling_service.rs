use crate::coordinator::{Coordinator, CoordinatorCommand, OpenGate, SharerGate};
use crate::error::ServerError;
use crate::signaling::SocketHandle;
use lenscast_core::{ParticipantId, StatusReport};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::error;

const COMMAND_BUFFER: usize = 256;

/// Cloneable front door to the coordinator task. Connection handlers only
/// ever talk to the registry through this.
#[derive(Clone)]
pub struct SignalingService {
    coordinator_tx: mpsc::Sender<CoordinatorCommand>,
}

impl SignalingService {
    pub fn new(coordinator_tx: mpsc::Sender<CoordinatorCommand>) -> Self {
        Self { coordinator_tx }
    }

    /// Spawns a coordinator with the default gate and returns its service.
    pub fn spawn() -> Self {
        Self::spawn_with_gate(Arc::new(OpenGate))
    }

    pub fn spawn_with_gate(gate: Arc<dyn SharerGate>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let coordinator = Coordinator::new(gate, rx);
        tokio::spawn(coordinator.run());
        Self::new(tx)
    }

    pub async fn connect(
        &self,
        participant_id: ParticipantId,
        socket: SocketHandle,
    ) -> Result<(), ServerError> {
        self.submit(CoordinatorCommand::Connect {
            participant_id,
            socket,
        })
        .await
    }

    pub async fn frame(&self, participant_id: ParticipantId, text: String) -> Result<(), ServerError> {
        self.submit(CoordinatorCommand::Frame {
            participant_id,
            text,
        })
        .await
    }

    pub async fn disconnect(&self, participant_id: ParticipantId) -> Result<(), ServerError> {
        self.submit(CoordinatorCommand::Disconnect { participant_id })
            .await
    }

    /// Resolves after every command submitted before it has been applied.
    pub async fn status(&self) -> Result<StatusReport, ServerError> {
        let (respond_to, rx) = oneshot::channel();
        self.submit(CoordinatorCommand::Status { respond_to }).await?;
        rx.await.map_err(|_| ServerError::CoordinatorGone)
    }

    async fn submit(&self, cmd: CoordinatorCommand) -> Result<(), ServerError> {
        self.coordinator_tx.send(cmd).await.map_err(|e| {
            error!("Coordinator died: {}", e);
            ServerError::CoordinatorGone
        })
    }
}
