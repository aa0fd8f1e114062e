pub use lenscast_core::{Envelope, ParticipantId, Role};

pub mod model {
    pub use lenscast_core::model::*;
    pub use lenscast_core::utils;
}

#[cfg(feature = "server")]
pub mod server {
    pub use lenscast_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use lenscast_client::*;
}
