use crate::registry::Participant;
use lenscast_core::{ParticipantId, Role};
use std::collections::HashMap;

/// What `Registry::remove` took out.
#[derive(Debug)]
pub enum Removed {
    Sharer(Participant),
    Watcher(Participant),
}

/// In-memory table of registered participants.
///
/// Holds at most one sharer. A participant is either the current sharer or a
/// watcher, never both. Only the coordinator owns a `Registry`, so every
/// mutation goes through these methods on a single task.
#[derive(Debug, Default)]
pub struct Registry {
    current_sharer: Option<Participant>,
    watchers: HashMap<ParticipantId, Participant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `sharer` the current sharer and hands back the one it supersedes.
    pub fn install_sharer(&mut self, sharer: Participant) -> Option<Participant> {
        debug_assert_eq!(sharer.role, Role::Sharer);
        self.watchers.remove(&sharer.id);
        self.current_sharer.replace(sharer)
    }

    pub fn add_watcher(&mut self, watcher: Participant) {
        debug_assert_eq!(watcher.role, Role::Watcher);
        if self.is_sharer(&watcher.id) {
            self.current_sharer = None;
        }
        self.watchers.insert(watcher.id.clone(), watcher);
    }

    pub fn remove(&mut self, id: &ParticipantId) -> Option<Removed> {
        if self.is_sharer(id) {
            return self.current_sharer.take().map(Removed::Sharer);
        }
        self.watchers.remove(id).map(Removed::Watcher)
    }

    pub fn is_sharer(&self, id: &ParticipantId) -> bool {
        self.current_sharer.as_ref().is_some_and(|s| &s.id == id)
    }

    pub fn sharer(&self) -> Option<&Participant> {
        self.current_sharer.as_ref()
    }

    /// A sharer is registered and its socket is still open.
    pub fn sharer_available(&self) -> bool {
        self.current_sharer.as_ref().is_some_and(Participant::is_open)
    }

    pub fn watcher(&self, id: &ParticipantId) -> Option<&Participant> {
        self.watchers.get(id)
    }

    pub fn watchers(&self) -> impl Iterator<Item = &Participant> {
        self.watchers.values()
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    pub fn role_of(&self, id: &ParticipantId) -> Option<Role> {
        if self.is_sharer(id) {
            Some(Role::Sharer)
        } else if self.watchers.contains_key(id) {
            Some(Role::Watcher)
        } else {
            None
        }
    }
}
