mod participant;
mod registry;

pub use participant::*;
pub use registry::*;
