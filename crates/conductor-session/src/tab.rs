//! AI tab data structure
//!
//! Each session owns one or more AI tabs; every tab is a separate
//! conversation with the session's agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent_error::AgentError;
use crate::state::SessionState;

/// Options for opening a fresh AI tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTabOptions {
    pub save_to_history: bool,
    pub show_thinking: bool,
}

impl Default for NewTabOptions {
    fn default() -> Self {
        Self {
            save_to_history: true,
            show_thinking: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiTab {
    /// Unique identifier
    pub id: String,
    /// Conversation id assigned by the agent, once it has started
    pub agent_session_id: Option<String>,
    /// User-assigned name
    pub name: Option<String>,
    pub state: SessionState,
    /// Error raised while this tab was the one talking to the agent
    pub agent_error: Option<AgentError>,
    pub save_to_history: bool,
    pub show_thinking: bool,
    pub created_at: DateTime<Utc>,
}

impl AiTab {
    pub fn new(options: NewTabOptions) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            agent_session_id: None,
            name: None,
            state: SessionState::Idle,
            agent_error: None,
            save_to_history: options.save_to_history,
            show_thinking: options.show_thinking,
            created_at: Utc::now(),
        }
    }

    /// Get display title (with fallback to the agent conversation id)
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.agent_session_id.as_deref())
            .unwrap_or("New Session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab() {
        let tab = AiTab::new(NewTabOptions::default());
        assert_eq!(tab.state, SessionState::Idle);
        assert!(tab.agent_error.is_none());
        assert!(tab.save_to_history);
        assert_eq!(tab.display_name(), "New Session");
    }

    #[test]
    fn test_display_name_prefers_user_name() {
        let mut tab = AiTab::new(NewTabOptions::default());
        tab.agent_session_id = Some("abc123".to_string());
        assert_eq!(tab.display_name(), "abc123");

        tab.name = Some("Refactor".to_string());
        assert_eq!(tab.display_name(), "Refactor");
    }
}
