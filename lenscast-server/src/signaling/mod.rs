mod signaling_service;
mod socket_handle;
mod ws_handler;

pub use signaling_service::*;
pub use socket_handle::*;
pub use ws_handler::*;
