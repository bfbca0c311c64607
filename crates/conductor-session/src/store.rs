//! Session Store
//!
//! In-memory collection of all sessions plus the id of the session the
//! user is looking at. Cloning the store clones the handle, not the data.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::SessionError;
use crate::session::Session;
use crate::Result;

pub struct SessionStore {
    /// All sessions, in sidebar order
    sessions: Arc<RwLock<Vec<Session>>>,
    /// Currently active session ID
    active_session_id: Arc<RwLock<Option<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_sessions(Vec::new())
    }

    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        let active = sessions.first().map(|s| s.id.clone());

        Self {
            sessions: Arc::new(RwLock::new(sessions)),
            active_session_id: Arc::new(RwLock::new(active)),
        }
    }

    /// Get a session by ID
    pub fn get_session(&self, session_id: &str) -> Result<Session> {
        self.sessions
            .read()
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().iter().any(|s| s.id == session_id)
    }

    pub fn list_sessions(&self) -> Vec<Session> {
        self.sessions.read().clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Apply `transform` to the whole collection under one write lock.
    pub fn update_sessions<F, T>(&self, transform: F) -> T
    where
        F: FnOnce(&mut Vec<Session>) -> T,
    {
        let mut sessions = self.sessions.write();
        transform(&mut sessions)
    }

    /// Mutate the session with `session_id`, leaving every other record untouched.
    pub fn update_session<F>(&self, session_id: &str, f: F) -> Result<Session>
    where
        F: FnOnce(&mut Session),
    {
        self.update_sessions(|sessions| {
            let session = sessions
                .iter_mut()
                .find(|s| s.id == session_id)
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
            f(session);
            Ok(session.clone())
        })
    }

    pub fn add_session(&self, session: Session) -> Result<()> {
        self.update_sessions(|sessions| {
            if sessions.iter().any(|s| s.id == session.id) {
                return Err(SessionError::AlreadyExists(session.id.clone()));
            }

            tracing::info!(
                session_id = %session.id,
                session_name = %session.name,
                tool_type = %session.tool_type,
                "Added session"
            );
            sessions.push(session);
            Ok(())
        })
    }

    pub fn remove_session(&self, session_id: &str) -> Result<Session> {
        let removed = self.update_sessions(|sessions| {
            let index = sessions
                .iter()
                .position(|s| s.id == session_id)
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
            Ok::<_, SessionError>(sessions.remove(index))
        })?;

        // Fall back to the first remaining session
        {
            let mut active = self.active_session_id.write();
            if active.as_deref() == Some(session_id) {
                *active = self.sessions.read().first().map(|s| s.id.clone());
            }
        }

        tracing::info!(session_id = %session_id, "Removed session");

        Ok(removed)
    }

    pub fn active_session_id(&self) -> Option<String> {
        self.active_session_id.read().clone()
    }

    pub fn active_session(&self) -> Option<Session> {
        let id = self.active_session_id()?;
        self.get_session(&id).ok()
    }

    pub fn set_active_session(&self, session_id: &str) -> Result<()> {
        if !self.contains(session_id) {
            return Err(SessionError::NotFound(session_id.to_string()));
        }

        *self.active_session_id.write() = Some(session_id.to_string());
        tracing::debug!(session_id = %session_id, "Switched active session");
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            active_session_id: Arc::clone(&self.active_session_id),
        }
    }
}
