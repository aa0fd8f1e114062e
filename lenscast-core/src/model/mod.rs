mod description;
mod envelope;
mod ice;
mod participant;
mod role;
mod status;

pub use description::{SdpKind, SessionDescription};
pub use envelope::Envelope;
pub use ice::{IceCandidate, IceServerConfig, IceTarget};
pub use participant::ParticipantId;
pub use role::Role;
pub use status::StatusReport;
