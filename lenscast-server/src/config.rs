use clap::Parser;
use std::net::{IpAddr, SocketAddr};

/// Signaling coordinator for one camera sharer and many watchers.
#[derive(Debug, Clone, Parser)]
#[command(name = "lenscast-server", version)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[arg(long, env = "LENSCAST_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Path of the signaling WebSocket endpoint.
    #[arg(long, env = "LENSCAST_WS_PATH", default_value = "/ws")]
    pub ws_path: String,

    /// `tracing` filter directive, e.g. `info` or `lenscast_server=debug`.
    #[arg(long = "log", env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            ws_path: "/ws".to_owned(),
            log_filter: "info".to_owned(),
        }
    }
}
