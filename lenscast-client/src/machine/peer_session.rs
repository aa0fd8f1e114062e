use crate::error::SessionError;
use lenscast_core::{Envelope, IceCandidate, ParticipantId, Role, SessionDescription};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Tags one native peer connection. Callbacks from any other generation are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    Requested,
    SharerLeft,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Offering,
    AwaitingOffer,
    Negotiating,
    Connected,
    Closed(CloseReason),
}

/// ICE / peer-connection state as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Checking,
    Connecting,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl TransportState {
    pub fn is_lost(self) -> bool {
        matches!(self, TransportState::Disconnected | TransportState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportState::New => "new",
            TransportState::Checking => "checking",
            TransportState::Connecting => "connecting",
            TransportState::Connected => "connected",
            TransportState::Completed => "completed",
            TransportState::Disconnected => "disconnected",
            TransportState::Failed => "failed",
            TransportState::Closed => "closed",
        }
    }
}

/// Work the session hands to whoever owns the native peer connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerAction {
    /// Create a peer connection; the sharer attaches every local track to it.
    Open {
        generation: Generation,
        attach_local_media: bool,
    },
    /// createOffer + setLocalDescription, then report `LocalDescription`.
    CreateOffer { generation: Generation },
    /// setRemoteDescription(offer) + createAnswer + setLocalDescription,
    /// then report `LocalDescription`.
    AcceptOffer {
        generation: Generation,
        offer: SessionDescription,
    },
    /// setRemoteDescription(answer), then report `RemoteDescriptionApplied`.
    ApplyAnswer {
        generation: Generation,
        answer: SessionDescription,
    },
    AddIceCandidate {
        generation: Generation,
        candidate: IceCandidate,
    },
    Close { generation: Generation },
    /// Stop every local media track.
    ReleaseLocalMedia,
    /// Send this envelope to the coordinator.
    Signal(Envelope),
    Report(SessionReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReport {
    RemoteMedia,
    Failed(String),
}

/// Completions and observations coming back from the native peer connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    LocalDescription {
        generation: Generation,
        description: SessionDescription,
    },
    RemoteDescriptionApplied {
        generation: Generation,
    },
    LocalCandidate {
        generation: Generation,
        candidate: IceCandidate,
    },
    TrackArrived {
        generation: Generation,
    },
    TransportChanged {
        generation: Generation,
        state: TransportState,
    },
    Failed {
        generation: Generation,
        reason: String,
    },
}

impl PeerEvent {
    pub fn generation(&self) -> Generation {
        match self {
            PeerEvent::LocalDescription { generation, .. }
            | PeerEvent::RemoteDescriptionApplied { generation }
            | PeerEvent::LocalCandidate { generation, .. }
            | PeerEvent::TrackArrived { generation }
            | PeerEvent::TransportChanged { generation, .. }
            | PeerEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Per-client negotiation state around a single native peer connection.
///
/// Opening a new peer connection always closes the previous one first and
/// bumps the generation, so late completions from the old one are dropped.
#[derive(Debug)]
pub struct PeerSession {
    role: Role,
    state: SessionState,
    generation: Generation,
    peer_open: bool,
    holds_local_media: bool,
    answered: bool,
    remote: Option<ParticipantId>,
    remote_media_reported: bool,
}

impl PeerSession {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: SessionState::Idle,
            generation: Generation::default(),
            peer_open: false,
            holds_local_media: role == Role::Sharer,
            answered: false,
            remote: None,
            remote_media_reported: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn has_peer_connection(&self) -> bool {
        self.peer_open
    }

    pub fn holds_local_media(&self) -> bool {
        self.holds_local_media
    }

    /// Sharer: open a fresh peer connection with local tracks and create an offer.
    pub fn start_offer(&mut self) -> Result<Vec<PeerAction>, SessionError> {
        self.expect_role(Role::Sharer, "start_offer")?;
        if !self.holds_local_media {
            return Err(SessionError::MediaReleased);
        }

        let mut actions = self.open();
        actions.push(PeerAction::CreateOffer {
            generation: self.generation,
        });
        self.state = SessionState::Offering;
        Ok(actions)
    }

    /// Watcher: a sharer is available, get a peer connection ready for its offer.
    pub fn prepare_for_offer(&mut self) -> Result<Vec<PeerAction>, SessionError> {
        self.expect_role(Role::Watcher, "prepare_for_offer")?;
        let actions = self.open();
        self.state = SessionState::AwaitingOffer;
        Ok(actions)
    }

    /// Watcher: apply an offer. Anything but a fresh, waiting peer connection
    /// is replaced first.
    pub fn accept_offer(
        &mut self,
        offer: SessionDescription,
    ) -> Result<Vec<PeerAction>, SessionError> {
        self.expect_role(Role::Watcher, "accept_offer")?;

        let mut actions = if self.peer_open && self.state == SessionState::AwaitingOffer {
            Vec::new()
        } else {
            info!("Opening a new peer connection for incoming offer");
            self.open()
        };

        actions.push(PeerAction::AcceptOffer {
            generation: self.generation,
            offer,
        });
        self.state = SessionState::Negotiating;
        Ok(actions)
    }

    /// Sharer: apply the first answer to the outstanding offer.
    pub fn apply_answer(
        &mut self,
        answer: SessionDescription,
        from: Option<ParticipantId>,
    ) -> Result<Vec<PeerAction>, SessionError> {
        self.expect_role(Role::Sharer, "apply_answer")?;

        if self.answered {
            return Err(SessionError::AnswerAlreadyApplied);
        }
        if self.state != SessionState::Negotiating {
            return Err(SessionError::UnexpectedAnswer(self.state.clone()));
        }

        self.answered = true;
        self.remote = from;
        Ok(vec![PeerAction::ApplyAnswer {
            generation: self.generation,
            answer,
        }])
    }

    /// Candidates are not queued: without a live peer connection this is an error.
    pub fn add_remote_candidate(
        &mut self,
        candidate: IceCandidate,
    ) -> Result<Vec<PeerAction>, SessionError> {
        if !self.peer_open {
            return Err(SessionError::NoPeerConnection);
        }
        Ok(vec![PeerAction::AddIceCandidate {
            generation: self.generation,
            candidate,
        }])
    }

    pub fn handle(&mut self, event: PeerEvent) -> Vec<PeerAction> {
        if !self.peer_open || event.generation() != self.generation {
            debug!(
                "Discarding stale peer event from generation {} (live: {})",
                event.generation(),
                self.generation
            );
            return Vec::new();
        }

        match event {
            PeerEvent::LocalDescription { description, .. } => {
                match (self.role, &self.state) {
                    (Role::Sharer, SessionState::Offering) => {
                        info!("Sending offer to watchers");
                        self.state = SessionState::Negotiating;
                        vec![PeerAction::Signal(Envelope::Offer { offer: description })]
                    }
                    (Role::Watcher, SessionState::Negotiating) => {
                        info!("Sending answer to sharer");
                        vec![PeerAction::Signal(Envelope::Answer {
                            answer: description,
                            from: None,
                        })]
                    }
                    (_, state) => {
                        warn!("Unexpected local description while {:?}", state);
                        Vec::new()
                    }
                }
            }

            PeerEvent::RemoteDescriptionApplied { .. } => {
                if self.role == Role::Sharer && self.state == SessionState::Negotiating {
                    info!("Remote description applied, sharer connected");
                    self.state = SessionState::Connected;
                }
                Vec::new()
            }

            PeerEvent::LocalCandidate { candidate, .. } => {
                vec![PeerAction::Signal(Envelope::IceCandidate {
                    candidate,
                    target: Some(self.role.opposite().into()),
                    to: self.remote.clone(),
                    from: None,
                })]
            }

            PeerEvent::TrackArrived { .. } => {
                if self.role != Role::Watcher {
                    return Vec::new();
                }
                self.state = SessionState::Connected;
                if self.remote_media_reported {
                    return Vec::new();
                }
                self.remote_media_reported = true;
                vec![PeerAction::Report(SessionReport::RemoteMedia)]
            }

            PeerEvent::TransportChanged { state, .. } => {
                if state.is_lost() {
                    self.fail(format!("Connection lost: {}", state.as_str()))
                } else {
                    debug!("Transport state: {}", state.as_str());
                    Vec::new()
                }
            }

            PeerEvent::Failed { reason, .. } => self.fail(reason),
        }
    }

    /// Releases the peer connection. Local media stays with the session.
    pub fn close(&mut self, reason: CloseReason) -> Vec<PeerAction> {
        let actions = self.release_peer();
        if !matches!(self.state, SessionState::Closed(_)) {
            self.state = SessionState::Closed(reason);
        }
        actions
    }

    /// `close` plus release of the sharer's local media, each at most once.
    pub fn shutdown(&mut self) -> Vec<PeerAction> {
        let mut actions = self.close(CloseReason::Requested);
        if self.holds_local_media {
            self.holds_local_media = false;
            actions.push(PeerAction::ReleaseLocalMedia);
        }
        actions
    }

    fn open(&mut self) -> Vec<PeerAction> {
        let mut actions = self.release_peer();
        self.generation = self.generation.next();
        self.peer_open = true;
        self.answered = false;
        self.remote = None;
        self.remote_media_reported = false;
        self.state = SessionState::Connecting;

        actions.push(PeerAction::Open {
            generation: self.generation,
            attach_local_media: self.role == Role::Sharer,
        });
        actions
    }

    fn release_peer(&mut self) -> Vec<PeerAction> {
        if !self.peer_open {
            return Vec::new();
        }

        let closed = self.generation;
        self.peer_open = false;
        // Anything still in flight for `closed` now fails the generation check.
        self.generation = self.generation.next();
        vec![PeerAction::Close { generation: closed }]
    }

    fn fail(&mut self, reason: String) -> Vec<PeerAction> {
        warn!("Peer session failed: {}", reason);
        let mut actions = self.release_peer();
        self.state = SessionState::Closed(CloseReason::Error(reason.clone()));
        actions.push(PeerAction::Report(SessionReport::Failed(reason)));
        actions
    }

    fn expect_role(&self, expected: Role, operation: &'static str) -> Result<(), SessionError> {
        if self.role == expected {
            Ok(())
        } else {
            Err(SessionError::WrongRole {
                operation,
                expected,
            })
        }
    }
}
