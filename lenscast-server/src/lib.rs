mod config;
mod coordinator;
mod error;
mod registry;
mod routes;
mod signaling;
mod telemetry;

pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use registry::*;
pub use routes::*;
pub use signaling::*;
pub use telemetry::*;
