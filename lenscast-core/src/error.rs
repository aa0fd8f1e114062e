use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("envelope has no `type` field")]
    MissingType,

    #[error("unknown envelope type `{0}`")]
    UnknownType(String),
}
