use crate::error::SessionError;
use crate::machine::{
    ClientEvent, CloseReason, LinkStatus, PeerAction, PeerEvent, PeerSession, ReconnectPolicy,
    SessionReport, SessionState,
};
use lenscast_core::utils::{ABNORMAL_CLOSURE, NORMAL_CLOSURE, default_ice_servers};
use lenscast_core::{Envelope, IceServerConfig, ParticipantId, Role};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub reconnect: ReconnectPolicy,
    pub heartbeat_interval: Duration,
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            reconnect: ReconnectPolicy::default(),
            heartbeat_interval: Duration::from_secs(15),
            ice_servers: default_ice_servers(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketPhase {
    Closed,
    Connecting,
    Open,
}

/// Side effects for the driver to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenSocket,
    SendFrame(String),
    CloseSocket { code: u16 },
    StartHeartbeat { every: Duration },
    StopHeartbeat,
    ScheduleReconnect { after: Duration },
    CancelReconnect,
    Peer(PeerAction),
    Emit(ClientEvent),
}

/// Owns the signaling socket's lifecycle and feeds the peer session.
///
/// Every input returns the actions it caused; the supervisor never touches
/// a socket, timer or peer connection itself.
#[derive(Debug)]
pub struct ConnectionSupervisor {
    role: Role,
    config: SupervisorConfig,
    socket: SocketPhase,
    participant_id: Option<ParticipantId>,
    reconnect_attempt: u32,
    reconnect_pending: bool,
    stopped: bool,
    session: PeerSession,
    status: LinkStatus,
}

impl ConnectionSupervisor {
    pub fn new(role: Role, config: SupervisorConfig) -> Self {
        Self {
            role,
            config,
            socket: SocketPhase::Closed,
            participant_id: None,
            reconnect_attempt: 0,
            reconnect_pending: false,
            stopped: false,
            session: PeerSession::new(role),
            status: LinkStatus::Idle,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn participant_id(&self) -> Option<&ParticipantId> {
        self.participant_id.as_ref()
    }

    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    pub fn socket_phase(&self) -> SocketPhase {
        self.socket
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    pub fn session(&self) -> &PeerSession {
        &self.session
    }

    /// Opens the signaling socket. A sharer whose media was released by
    /// `disconnect` cannot connect again; start a new supervisor with fresh media.
    pub fn connect(&mut self) -> Result<Vec<Action>, SessionError> {
        if self.socket != SocketPhase::Closed {
            debug!("Connect ignored, socket already {:?}", self.socket);
            return Ok(Vec::new());
        }
        if self.role == Role::Sharer && !self.session.holds_local_media() {
            return Err(SessionError::MediaReleased);
        }

        info!("Connecting to signaling server as {}", self.role);
        self.stopped = false;
        self.reconnect_attempt = 0;

        let mut actions = Vec::new();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            actions.push(Action::CancelReconnect);
        }
        actions.extend(self.open_socket());
        Ok(actions)
    }

    pub fn on_socket_open(&mut self) -> Vec<Action> {
        if self.socket != SocketPhase::Connecting {
            debug!("Socket open ignored while {:?}", self.socket);
            return Vec::new();
        }

        info!("Signaling socket open, registering as {}", self.role);
        self.socket = SocketPhase::Open;

        let mut actions = Vec::new();
        actions.extend(self.signal(&Envelope::Register { role: self.role }));
        actions.push(Action::StartHeartbeat {
            every: self.config.heartbeat_interval,
        });
        actions
    }

    pub fn on_frame(&mut self, text: &str) -> Vec<Action> {
        let envelope = match Envelope::decode(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Dropping invalid frame: {}", e);
                return Vec::new();
            }
        };
        debug!("Received {}", envelope.kind());

        match envelope {
            Envelope::Registered {
                id,
                sharer_available,
            } => self.on_registered(id, sharer_available),

            Envelope::SharerConnected if self.role == Role::Watcher => {
                info!("Sharer connected");
                let result = self.session.prepare_for_offer();
                self.after_session(result, LinkStatus::Negotiating)
            }

            Envelope::SharerDisconnected if self.role == Role::Watcher => {
                info!("Sharer disconnected");
                let peer = self.session.close(CloseReason::SharerLeft);
                let mut actions = self.absorb(peer);
                actions.extend(self.set_status(LinkStatus::WaitingForSharer));
                actions
            }

            Envelope::Offer { offer } if self.role == Role::Watcher => {
                let result = self.session.accept_offer(offer);
                self.after_session(result, LinkStatus::Negotiating)
            }

            Envelope::Answer { answer, from } if self.role == Role::Sharer => {
                match self.session.apply_answer(answer, from) {
                    Ok(peer) => self.absorb(peer),
                    Err(e) => {
                        info!("Ignoring answer: {}", e);
                        Vec::new()
                    }
                }
            }

            Envelope::IceCandidate { candidate, .. } => {
                match self.session.add_remote_candidate(candidate) {
                    Ok(peer) => self.absorb(peer),
                    Err(e) if matches!(self.session.state(), SessionState::Closed(_)) => {
                        debug!("Remote ICE candidate after the session closed: {}", e);
                        Vec::new()
                    }
                    Err(e) => {
                        warn!("Rejected remote ICE candidate: {}", e);
                        vec![Action::Emit(ClientEvent::SessionError {
                            reason: e.to_string(),
                        })]
                    }
                }
            }

            Envelope::HeartbeatAck => Vec::new(),

            other => {
                debug!("Ignoring {} as {}", other.kind(), self.role);
                Vec::new()
            }
        }
    }

    /// Handles a socket close. A second close for the same socket is ignored.
    pub fn on_socket_close(&mut self, code: u16) -> Vec<Action> {
        if self.socket == SocketPhase::Closed {
            debug!("Close ({}) for an already closed socket ignored", code);
            return Vec::new();
        }

        self.socket = SocketPhase::Closed;
        self.participant_id = None;
        let mut actions = vec![Action::StopHeartbeat];

        if self.stopped {
            return actions;
        }

        if code == NORMAL_CLOSURE {
            info!("Signaling socket closed normally, not reconnecting");
            let reason = String::from("Signaling server closed the connection");
            actions.push(Action::Emit(ClientEvent::ConnectionFailed {
                reason: reason.clone(),
            }));
            actions.extend(self.set_status(LinkStatus::Lost { reason }));
            return actions;
        }

        let policy = self.config.reconnect;
        if policy.allows(self.reconnect_attempt) {
            let after = policy.delay(self.reconnect_attempt);
            self.reconnect_attempt += 1;
            self.reconnect_pending = true;
            info!(
                "Signaling socket closed ({}), reconnect attempt {} in {:?}",
                code, self.reconnect_attempt, after
            );

            actions.push(Action::ScheduleReconnect { after });
            actions.push(Action::Emit(ClientEvent::Reconnecting {
                attempt: self.reconnect_attempt,
                delay_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
            }));
            actions.extend(self.set_status(LinkStatus::Lost {
                reason: format!("Signaling connection closed ({code})"),
            }));
        } else {
            error!(
                "Giving up after {} reconnect attempts",
                self.reconnect_attempt
            );
            let reason = format!(
                "Could not reach the signaling server after {} attempts",
                self.reconnect_attempt
            );
            let peer = self.session.close(CloseReason::Error(reason.clone()));
            actions.extend(self.absorb(peer));
            actions.push(Action::Emit(ClientEvent::ConnectionFailed {
                reason: reason.clone(),
            }));
            actions.extend(self.set_status(LinkStatus::Lost { reason }));
        }
        actions
    }

    pub fn on_socket_error(&mut self) -> Vec<Action> {
        warn!("Signaling socket error");
        self.on_socket_close(ABNORMAL_CLOSURE)
    }

    pub fn on_reconnect_timer(&mut self) -> Vec<Action> {
        if !self.reconnect_pending || self.stopped {
            return Vec::new();
        }
        self.reconnect_pending = false;
        self.open_socket()
    }

    pub fn on_heartbeat_tick(&mut self) -> Vec<Action> {
        if self.socket != SocketPhase::Open {
            return Vec::new();
        }
        self.signal(&Envelope::Heartbeat).into_iter().collect()
    }

    pub fn on_peer_event(&mut self, event: PeerEvent) -> Vec<Action> {
        let peer = self.session.handle(event);
        self.absorb(peer)
    }

    /// Sharer only: drop the current peer connection and offer again.
    pub fn renegotiate(&mut self) -> Result<Vec<Action>, SessionError> {
        if self.role != Role::Sharer {
            return Err(SessionError::WrongRole {
                operation: "renegotiate",
                expected: Role::Sharer,
            });
        }
        if self.participant_id.is_none() || self.socket != SocketPhase::Open {
            return Err(SessionError::NotRegistered);
        }

        info!("Renegotiating");
        let peer = self.session.start_offer()?;
        Ok(self.absorb(peer))
    }

    /// Explicit shutdown. Calling it again is a no-op.
    pub fn disconnect(&mut self) -> Vec<Action> {
        if self.stopped {
            return Vec::new();
        }

        info!("Disconnecting");
        self.stopped = true;
        self.participant_id = None;

        let mut actions = Vec::new();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            actions.push(Action::CancelReconnect);
        }
        actions.push(Action::StopHeartbeat);
        if self.socket != SocketPhase::Closed {
            self.socket = SocketPhase::Closed;
            actions.push(Action::CloseSocket {
                code: NORMAL_CLOSURE,
            });
        }

        let peer = self.session.shutdown();
        actions.extend(self.absorb(peer));
        actions.extend(self.set_status(LinkStatus::Disconnected));
        actions
    }

    fn on_registered(&mut self, id: ParticipantId, sharer_available: Option<bool>) -> Vec<Action> {
        info!("Registered as {} ({})", id, self.role);
        self.participant_id = Some(id.clone());
        self.reconnect_attempt = 0;

        let mut actions = vec![Action::Emit(ClientEvent::Registered { id })];
        let next = match self.role {
            Role::Sharer => {
                let result = self.session.start_offer();
                self.after_session(result, LinkStatus::Sharing)
            }
            Role::Watcher if sharer_available == Some(true) => {
                let result = self.session.prepare_for_offer();
                self.after_session(result, LinkStatus::Negotiating)
            }
            Role::Watcher => {
                info!("No sharer yet");
                // A peer connection left over from before a reconnect has no sharer behind it.
                let mut actions = Vec::new();
                if self.session.has_peer_connection() {
                    let peer = self.session.close(CloseReason::SharerLeft);
                    actions.extend(self.absorb(peer));
                }
                actions.extend(self.set_status(LinkStatus::WaitingForSharer));
                actions
            }
        };
        actions.extend(next);
        actions
    }

    fn after_session(
        &mut self,
        result: Result<Vec<PeerAction>, SessionError>,
        status: LinkStatus,
    ) -> Vec<Action> {
        match result {
            Ok(peer) => {
                let mut actions = self.absorb(peer);
                actions.extend(self.set_status(status));
                actions
            }
            Err(e) => {
                warn!("Peer session rejected the request: {}", e);
                vec![Action::Emit(ClientEvent::SessionError {
                    reason: e.to_string(),
                })]
            }
        }
    }

    /// Lowers peer actions into driver actions.
    fn absorb(&mut self, peer: Vec<PeerAction>) -> Vec<Action> {
        let mut actions = Vec::with_capacity(peer.len());
        for action in peer {
            match action {
                PeerAction::Signal(envelope) => actions.extend(self.signal(&envelope)),
                PeerAction::Report(SessionReport::RemoteMedia) => {
                    actions.push(Action::Emit(ClientEvent::RemoteMedia));
                    actions.extend(self.set_status(LinkStatus::Connected));
                }
                PeerAction::Report(SessionReport::Failed(reason)) => {
                    actions.push(Action::Emit(ClientEvent::SessionError {
                        reason: reason.clone(),
                    }));
                    actions.extend(self.set_status(LinkStatus::Lost { reason }));
                }
                other => actions.push(Action::Peer(other)),
            }
        }
        actions
    }

    fn signal(&self, envelope: &Envelope) -> Option<Action> {
        if self.socket != SocketPhase::Open {
            debug!("Socket not open, {} not sent", envelope.kind());
            return None;
        }
        match envelope.encode() {
            Ok(text) => Some(Action::SendFrame(text)),
            Err(e) => {
                error!("Failed to encode {}: {}", envelope.kind(), e);
                None
            }
        }
    }

    fn open_socket(&mut self) -> Vec<Action> {
        self.socket = SocketPhase::Connecting;
        let mut actions = vec![Action::OpenSocket];
        actions.extend(self.set_status(LinkStatus::Connecting));
        actions
    }

    fn set_status(&mut self, status: LinkStatus) -> Option<Action> {
        if self.status == status {
            return None;
        }
        self.status = status.clone();
        Some(Action::Emit(ClientEvent::Status { status }))
    }
}
