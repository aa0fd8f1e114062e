mod coordinator;
mod coordinator_command;
mod relay_stats;
mod sharer_gate;

pub use coordinator::*;
pub use coordinator_command::*;
pub use relay_stats::*;
pub use sharer_gate::*;
