
use async_trait::async_trait;
use lenscast_core::ParticipantId;
use lenscast_server::{SharerGate, SignalingService, install_metrics_recorder};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::{Arc, OnceLock};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// The recorder is process-wide, so every test shares one handle.
pub fn metrics_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| install_metrics_recorder().expect("metrics recorder installs once"))
        .clone()
}

pub fn create_test_service() -> SignalingService {
    SignalingService::spawn()
}

/// Refuses every sharer registration.
pub struct DenyGate;

#[async_trait]
impl SharerGate for DenyGate {
    async fn authorize(&self, _participant_id: &ParticipantId) -> bool {
        false
    }
}

pub fn create_gated_service() -> SignalingService {
    SignalingService::spawn_with_gate(Arc::new(DenyGate))
}
