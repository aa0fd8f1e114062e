use async_trait::async_trait;
use lenscast_core::ParticipantId;

/// Decides whether a socket may register as the sharer.
///
/// Consulted before the registry is touched, so a deployment can plug in a
/// real check without changing any relay logic.
#[async_trait]
pub trait SharerGate: Send + Sync + 'static {
    async fn authorize(&self, participant_id: &ParticipantId) -> bool;
}

/// Admits every sharer registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenGate;

#[async_trait]
impl SharerGate for OpenGate {
    async fn authorize(&self, _participant_id: &ParticipantId) -> bool {
        true
    }
}
