use std::collections::HashMap;
use std::sync::Arc;

use super::{Session, SessionId};

/// Maps protocol session ids to live session handles.
///
/// Contains exactly the currently joined sessions. Used to resolve the ids
/// named in a publish's eligible/exclude lists and to reach receivers.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Arc<dyn Session>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false without replacing anything if the id is already taken.
    pub fn register(&mut self, session: Arc<dyn Session>) -> bool {
        let id = session.id();
        if self.sessions.contains_key(&id) {
            return false;
        }
        self.sessions.insert(id, session);
        true
    }

    /// Remove a session, returning its handle if it was registered.
    pub fn deregister(&mut self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sessions.remove(&id)
    }

    /// Look up the live handle for a session id.
    pub fn resolve(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sessions.get(&id).cloned()
    }

    /// Resolve a list of ids, skipping the ones with no live session.
    pub fn resolve_all<'a, I>(&self, ids: I) -> Vec<Arc<dyn Session>>
    where
        I: IntoIterator<Item = &'a SessionId>,
    {
        ids.into_iter().filter_map(|id| self.resolve(*id)).collect()
    }

    /// Whether a session with this id is registered.
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.sessions.keys().collect();
        ids.sort();
        f.debug_struct("SessionRegistry").field("sessions", &ids).finish()
    }
}
