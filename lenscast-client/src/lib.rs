pub mod error;
pub mod machine;

#[cfg(target_arch = "wasm32")]
mod engine;
#[cfg(target_arch = "wasm32")]
mod logger;

pub use error::SessionError;
pub use machine::*;

#[cfg(target_arch = "wasm32")]
pub use engine::{EngineConfig, LensCast, LensCastEngine};
