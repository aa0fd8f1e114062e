use crate::coordinator::{CoordinatorCommand, DropKind, RelayStats, SharerGate};
use crate::registry::{Participant, Registry, Removed};
use crate::signaling::SocketHandle;
use lenscast_core::{
    Envelope, IceCandidate, IceTarget, ParticipantId, Role, SessionDescription, StatusReport,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the registry and applies every signaling frame, one at a time.
pub struct Coordinator {
    registry: Registry,
    sockets: HashMap<ParticipantId, SocketHandle>,
    gate: Arc<dyn SharerGate>,
    command_rx: mpsc::Receiver<CoordinatorCommand>,
    stats: RelayStats,
}

impl Coordinator {
    pub fn new(gate: Arc<dyn SharerGate>, command_rx: mpsc::Receiver<CoordinatorCommand>) -> Self {
        Self {
            registry: Registry::new(),
            sockets: HashMap::new(),
            gate,
            command_rx,
            stats: RelayStats::default(),
        }
    }

    pub async fn run(mut self) {
        info!("Coordinator event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Coordinator event loop finished");
    }

    async fn handle_command(&mut self, cmd: CoordinatorCommand) {
        match cmd {
            CoordinatorCommand::Connect {
                participant_id,
                socket,
            } => {
                debug!("Socket attached for {}", participant_id);
                self.sockets.insert(participant_id, socket);
            }

            CoordinatorCommand::Frame {
                participant_id,
                text,
            } => match Envelope::decode(&text) {
                Ok(envelope) => {
                    debug!("Received {} from {}", envelope.kind(), participant_id);
                    self.handle_envelope(participant_id, envelope).await;
                }
                Err(e) => {
                    warn!("Dropping invalid frame from {}: {}", participant_id, e);
                    self.stats.record_invalid_frame();
                }
            },

            CoordinatorCommand::Disconnect { participant_id } => {
                self.on_disconnect(&participant_id);
            }

            CoordinatorCommand::Status { respond_to } => {
                let _ = respond_to.send(self.status());
            }
        }
    }

    async fn handle_envelope(&mut self, sender: ParticipantId, envelope: Envelope) {
        match envelope {
            Envelope::Register { role } => self.register(sender, role).await,
            Envelope::Offer { offer } => self.relay_offer(&sender, offer),
            Envelope::Answer { answer, .. } => self.relay_answer(sender, answer),
            Envelope::IceCandidate {
                candidate,
                target,
                to,
                ..
            } => self.relay_ice_candidate(sender, candidate, target, to),
            Envelope::Heartbeat => self.reply(&sender, &Envelope::HeartbeatAck),
            other => {
                warn!(
                    "Ignoring server-bound {} envelope from {}",
                    other.kind(),
                    sender
                );
            }
        }
    }

    async fn register(&mut self, id: ParticipantId, role: Role) {
        let Some(socket) = self.sockets.get(&id).cloned() else {
            warn!("Register from {} without an attached socket", id);
            return;
        };

        if role == Role::Sharer && !self.gate.authorize(&id).await {
            warn!("Sharer registration from {} rejected", id);
            self.stats.record_rejected_sharer();
            return;
        }

        // Re-registering on the same socket starts from a clean slate.
        if let Some(previous) = self.registry.role_of(&id) {
            debug!("{} re-registering as {}, was {}", id, role, previous);
            self.registry.remove(&id);
            if previous == Role::Sharer && role == Role::Watcher {
                info!("Sharer {} re-registered as watcher", id);
                self.broadcast_to_watchers(&Envelope::SharerDisconnected, None);
            }
        }

        let participant = Participant::new(id.clone(), role, socket);

        match role {
            Role::Sharer => {
                info!("Registering {} as sharer", id);
                if let Some(previous) = self.registry.install_sharer(participant) {
                    if previous.id != id {
                        info!("Sharer {} superseded by {}", previous.id, id);
                    }
                }

                let notified = self.broadcast_to_watchers(&Envelope::SharerConnected, None);
                debug!("Notified {} watchers that a sharer is available", notified);

                self.reply(
                    &id,
                    &Envelope::Registered {
                        id: id.clone(),
                        sharer_available: None,
                    },
                );
            }
            Role::Watcher => {
                self.registry.add_watcher(participant);
                let sharer_available = self.registry.sharer_available();
                info!(
                    "Registering {} as watcher, sharer available: {}",
                    id, sharer_available
                );

                self.reply(
                    &id,
                    &Envelope::Registered {
                        id: id.clone(),
                        sharer_available: Some(sharer_available),
                    },
                );
            }
        }
    }

    /// The sender is not checked against the registered sharer.
    fn relay_offer(&mut self, sender: &ParticipantId, offer: SessionDescription) {
        let delivered = self.broadcast_to_watchers(&Envelope::Offer { offer }, Some(sender));
        debug!("Forwarded offer from {} to {} watchers", sender, delivered);
    }

    fn relay_answer(&mut self, sender: ParticipantId, answer: SessionDescription) {
        let envelope = Envelope::Answer {
            answer,
            from: Some(sender.clone()),
        };

        if !self.send_to_sharer(&envelope) {
            debug!("No active sharer to receive answer from {}", sender);
            self.stats.record_drop(DropKind::AnswerWithoutSharer);
        }
    }

    fn relay_ice_candidate(
        &mut self,
        sender: ParticipantId,
        candidate: IceCandidate,
        target: Option<IceTarget>,
        to: Option<ParticipantId>,
    ) {
        let envelope = Envelope::IceCandidate {
            candidate,
            target: None,
            to: None,
            from: Some(sender.clone()),
        };

        match (target, to) {
            (Some(IceTarget::Sharer), _) => {
                if !self.send_to_sharer(&envelope) {
                    debug!("No active sharer for ICE candidate from {}", sender);
                    self.stats.record_drop(DropKind::IceWithoutSharer);
                }
            }
            (Some(IceTarget::Watcher), Some(to)) => {
                let delivered = self
                    .registry
                    .watcher(&to)
                    .is_some_and(|w| w.socket.send(&envelope));
                if !delivered {
                    debug!("ICE candidate from {} for unreachable watcher {}", sender, to);
                    self.stats.record_drop(DropKind::IceUnknownWatcher);
                }
            }
            (Some(IceTarget::Watcher), None) => {
                let delivered = self.broadcast_to_watchers(&envelope, Some(&sender));
                debug!("Broadcast ICE candidate from {} to {} watchers", sender, delivered);
            }
            (None, _) => {
                warn!("ICE candidate from {} has no target", sender);
                self.stats.record_drop(DropKind::IceWithoutTarget);
            }
        }
    }

    fn on_disconnect(&mut self, id: &ParticipantId) {
        self.sockets.remove(id);

        match self.registry.remove(id) {
            Some(Removed::Sharer(_)) => {
                info!("Sharer {} disconnected, notifying watchers", id);
                self.broadcast_to_watchers(&Envelope::SharerDisconnected, None);
            }
            Some(Removed::Watcher(_)) => info!("Watcher {} disconnected", id),
            None => debug!("Unregistered participant {} disconnected", id),
        }
    }

    fn send_to_sharer(&self, envelope: &Envelope) -> bool {
        self.registry
            .sharer()
            .is_some_and(|sharer| sharer.socket.send(envelope))
    }

    /// Sends to every watcher whose socket is open at the moment of sending.
    fn broadcast_to_watchers(&mut self, envelope: &Envelope, skip: Option<&ParticipantId>) -> usize {
        let mut delivered = 0;
        let mut skipped = 0;

        for watcher in self.registry.watchers() {
            if skip == Some(&watcher.id) {
                continue;
            }
            if watcher.socket.send(envelope) {
                delivered += 1;
            } else {
                skipped += 1;
            }
        }

        for _ in 0..skipped {
            self.stats.record_drop(DropKind::ClosedRecipient);
        }
        delivered
    }

    fn reply(&mut self, id: &ParticipantId, envelope: &Envelope) {
        let sent = self
            .sockets
            .get(id)
            .is_some_and(|socket| socket.send(envelope));
        if !sent {
            debug!("Could not reply {} to {}", envelope.kind(), id);
            self.stats.record_drop(DropKind::ReplyToClosedSocket);
        }
    }

    fn status(&self) -> StatusReport {
        StatusReport {
            sharer_connected: self.registry.sharer_available(),
            watcher_count: self.registry.watcher_count(),
            dropped_relays: self.stats.dropped,
        }
    }
}
