//! Signaling and negotiation state machines, free of any browser types.

mod backoff;
mod events;
mod peer_session;
mod supervisor;

pub use backoff::ReconnectPolicy;
pub use events::{ClientEvent, LinkStatus};
pub use peer_session::{
    CloseReason, Generation, PeerAction, PeerEvent, PeerSession, SessionReport, SessionState,
    TransportState,
};
pub use supervisor::{Action, ConnectionSupervisor, SocketPhase, SupervisorConfig};
