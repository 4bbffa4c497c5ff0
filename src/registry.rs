use crate::error::BattleError;
use crate::sim::session::BattleSession;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Store of active battle sessions. The map lock is only held long enough to
/// resolve an id; each session then serializes its own mutation behind its
/// own mutex, so actions on one session never block another.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<BattleSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: BattleSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Run `f` with exclusive access to the session. The session lock is held
    /// for the whole closure and released on every exit path.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut BattleSession) -> Result<T, BattleError>,
    ) -> Result<T, BattleError> {
        let session = self
            .sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(BattleError::SessionNotFound(id))?;
        let mut session = session.lock();
        f(&mut session)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().remove(&id).is_some()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
