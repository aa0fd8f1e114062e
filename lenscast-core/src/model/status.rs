use serde::{Deserialize, Serialize};

/// Operational snapshot served on `GET /api/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub sharer_connected: bool,
    pub watcher_count: usize,
    pub dropped_relays: u64,
}
