use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::signaling::{SignalingService, ws_handler};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use lenscast_core::StatusReport;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(
    config: &ServerConfig,
    service: SignalingService,
    metrics: PrometheusHandle,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&config.ws_path, get(ws_handler))
        .route("/api/status", get(status_handler))
        .route(
            "/metrics",
            get(move || {
                let metrics = metrics.clone();
                async move { metrics.render() }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

async fn status_handler(
    State(service): State<SignalingService>,
) -> Result<Json<StatusReport>, StatusCode> {
    service
        .status()
        .await
        .map(Json)
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}

/// Binds, spawns the coordinator and serves until `shutdown` resolves.
pub async fn serve<F>(
    config: ServerConfig,
    metrics: PrometheusHandle,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let service = SignalingService::spawn();
    let app = router(&config, service, metrics);

    info!("Signaling server listening on http://{}{}", addr, config.ws_path);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
