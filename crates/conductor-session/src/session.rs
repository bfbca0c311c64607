//! Session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent_error::AgentError;
use crate::error::SessionError;
use crate::state::{InputMode, SessionState};
use crate::tab::{AiTab, NewTabOptions};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier, also the prefix of the session's process names
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Agent id this session runs (e.g. `claude-code`)
    pub tool_type: String,
    pub state: SessionState,
    pub input_mode: InputMode,
    pub ai_tabs: Vec<AiTab>,
    pub active_tab_id: Option<String>,
    /// Error currently blocking the session
    pub agent_error: Option<AgentError>,
    /// Tab that raised `agent_error`
    pub agent_error_tab_id: Option<String>,
    /// Input is paused until the error is dealt with
    pub agent_error_paused: bool,
    /// Remote host the agent runs on, if any
    pub ssh_remote_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(name: String, tool_type: String) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }

        let now = Utc::now();
        let tab = AiTab::new(NewTabOptions::default());

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            tool_type,
            state: SessionState::Idle,
            input_mode: InputMode::Ai,
            active_tab_id: Some(tab.id.clone()),
            ai_tabs: vec![tab],
            agent_error: None,
            agent_error_tab_id: None,
            agent_error_paused: false,
            ssh_remote_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn tab(&self, tab_id: &str) -> Option<&AiTab> {
        self.ai_tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn active_tab(&self) -> Option<&AiTab> {
        self.active_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    /// Open a new AI tab and make it the active one
    pub fn add_tab(&mut self, options: NewTabOptions) -> &AiTab {
        let tab = AiTab::new(options);
        self.active_tab_id = Some(tab.id.clone());
        self.ai_tabs.push(tab);
        self.updated_at = Utc::now();

        &self.ai_tabs[self.ai_tabs.len() - 1]
    }

    pub fn set_active_tab(&mut self, tab_id: &str) -> Result<()> {
        if self.tab(tab_id).is_none() {
            return Err(SessionError::TabNotFound(tab_id.to_string()));
        }

        self.active_tab_id = Some(tab_id.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn has_error(&self) -> bool {
        self.agent_error.is_some()
    }

    /// Record an agent error and pause the session.
    ///
    /// The error is also attached to `tab_id` when that tab exists.
    pub fn record_agent_error(&mut self, error: AgentError, tab_id: Option<&str>) {
        let tab_id = tab_id
            .map(str::to_string)
            .or_else(|| self.active_tab_id.clone());

        if let Some(tab) = tab_id
            .as_deref()
            .and_then(|id| self.ai_tabs.iter_mut().find(|t| t.id == id))
        {
            tab.agent_error = Some(error.clone());
            tab.state = SessionState::Error;
        }

        tracing::debug!(
            session_id = %self.id,
            kind = %error.kind,
            "Agent error recorded"
        );

        self.agent_error = Some(error);
        self.agent_error_tab_id = tab_id;
        self.agent_error_paused = true;
        self.state = SessionState::Error;
        self.updated_at = Utc::now();
    }

    /// Clear the agent error and return the session to idle.
    ///
    /// Both `tab_id` (when given) and the tab that raised the error lose
    /// their tab error, so no tab is left holding an error the session no
    /// longer points at. State always ends up `Idle` whatever was set
    /// before.
    pub fn clear_agent_error(&mut self, tab_id: Option<&str>) {
        let offending = self.agent_error_tab_id.take();

        for tab in self.ai_tabs.iter_mut().filter(|t| {
            tab_id == Some(t.id.as_str()) || offending.as_deref() == Some(t.id.as_str())
        }) {
            tab.agent_error = None;
            if tab.state == SessionState::Error {
                tab.state = SessionState::Idle;
            }
        }

        self.agent_error = None;
        self.agent_error_tab_id = None;
        self.agent_error_paused = false;
        self.state = SessionState::Idle;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent_error::AgentErrorKind;

    fn session() -> Session {
        Session::new("Work".to_string(), "claude-code".to_string()).unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = session();
        assert_eq!(session.state, SessionState::Idle);
        assert_eq!(session.input_mode, InputMode::Ai);
        assert_eq!(session.ai_tabs.len(), 1);
        assert_eq!(session.active_tab().unwrap().id, session.ai_tabs[0].id);
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Session::new("  ".to_string(), "claude-code".to_string());
        assert!(matches!(result, Err(SessionError::EmptyName)));
    }

    #[test]
    fn test_record_and_clear_error() {
        let mut session = session();
        let tab_id = session.ai_tabs[0].id.clone();

        session.record_agent_error(
            AgentError::new(AgentErrorKind::AgentCrashed, "claude-code", "exited 1"),
            Some(&tab_id),
        );
        assert_eq!(session.state, SessionState::Error);
        assert!(session.has_error());
        assert!(session.agent_error_paused);
        assert_eq!(session.agent_error_tab_id.as_deref(), Some(tab_id.as_str()));
        assert!(session.tab(&tab_id).unwrap().agent_error.is_some());

        session.clear_agent_error(None);
        assert_eq!(session.state, SessionState::Idle);
        assert!(!session.has_error());
        assert!(session.agent_error_tab_id.is_none());
        assert!(!session.agent_error_paused);
        assert!(session.tab(&tab_id).unwrap().agent_error.is_none());
        assert_eq!(session.tab(&tab_id).unwrap().state, SessionState::Idle);
    }

    #[test]
    fn test_clear_named_tab_also_clears_offending_tab() {
        let mut session = session();
        let first = session.ai_tabs[0].id.clone();
        let second = session.add_tab(NewTabOptions::default()).id.clone();
        let third = session.add_tab(NewTabOptions::default()).id.clone();

        session.record_agent_error(
            AgentError::new(AgentErrorKind::AgentCrashed, "claude-code", "exited 1"),
            Some(&first),
        );
        session.ai_tabs[1].agent_error = Some(AgentError::new(
            AgentErrorKind::RateLimited,
            "claude-code",
            "slow down",
        ));
        session.ai_tabs[2].agent_error = Some(AgentError::new(
            AgentErrorKind::NetworkError,
            "claude-code",
            "offline",
        ));

        session.clear_agent_error(Some(&second));
        assert!(session.tab(&first).unwrap().agent_error.is_none());
        assert_eq!(session.tab(&first).unwrap().state, SessionState::Idle);
        assert!(session.tab(&second).unwrap().agent_error.is_none());
        // Tabs that are neither named nor offending keep their error
        assert!(session.tab(&third).unwrap().agent_error.is_some());
    }

    #[test]
    fn test_clear_without_error_still_idles() {
        let mut session = session();
        session.state = SessionState::Busy;

        session.clear_agent_error(None);
        assert_eq!(session.state, SessionState::Idle);
    }

    #[test]
    fn test_add_tab_activates_it() {
        let mut session = session();
        let new_id = session.add_tab(NewTabOptions::default()).id.clone();

        assert_eq!(session.ai_tabs.len(), 2);
        assert_eq!(session.active_tab_id.as_deref(), Some(new_id.as_str()));
        assert!(session.set_active_tab("missing").is_err());
    }
}
