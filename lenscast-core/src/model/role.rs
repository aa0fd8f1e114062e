use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sharer,
    Watcher,
}

impl Role {
    /// The role on the other end of the star: sharers talk to watchers and back.
    pub fn opposite(self) -> Self {
        match self {
            Role::Sharer => Role::Watcher,
            Role::Watcher => Role::Sharer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sharer => f.write_str("sharer"),
            Role::Watcher => f.write_str("watcher"),
        }
    }
}
