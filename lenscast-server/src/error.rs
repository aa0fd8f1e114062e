use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("coordinator task is no longer running")]
    CoordinatorGone,

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
