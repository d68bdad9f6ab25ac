//! In-Memory Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;

use crate::application::ports::{Session, SessionError, SessionManagerPort};

/// 内存会话管理器
pub struct InMemorySessionManager {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn create(&self, session: Session) -> Result<String, SessionError> {
        let session_id = session.id.clone();
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyExists(session_id));
        }
        self.sessions.insert(session_id.clone(), session);
        tracing::debug!(sessions = self.sessions.len(), "Session created");
        Ok(session_id)
    }

    fn get(&self, id: &str) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        if session.is_expired(Utc::now()) {
            self.sessions.remove(id);
            return Err(SessionError::Expired(id.to_string()));
        }
        Ok(session)
    }

    fn destroy(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|_| {
                tracing::debug!("Session destroyed");
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            tracing::info!(purged = purged, "Expired sessions purged");
        }
        purged
    }

    fn count(&self) -> usize {
        self.sessions.len()
    }
}
