use crate::error::ServerError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Installs the process-wide Prometheus recorder behind the relay counters.
/// Can only succeed once per process.
pub fn install_metrics_recorder() -> Result<PrometheusHandle, ServerError> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}
