//! Application state container
//!
//! Built once by the host and passed to whatever drives the UI.

use std::sync::Arc;

use conductor_bridge::{LocalProcessBridge, ProcessControl};
use conductor_session::{Session, SessionStore};

use crate::agents::AgentStore;
use crate::config::Config;
use crate::Result;

pub struct App {
    config: Config,
    sessions: SessionStore,
    agents: AgentStore,
}

impl App {
    /// Build an app around an existing bridge
    pub fn new(config: Config, bridge: Arc<dyn ProcessControl>) -> Self {
        let sessions = SessionStore::new();
        let agents = AgentStore::new(sessions.clone(), bridge);

        Self {
            config,
            sessions,
            agents,
        }
    }

    /// Build an app that runs agents on this machine
    pub fn local(config: Config) -> Self {
        let bridge = if config.search_paths.is_empty() {
            LocalProcessBridge::new(config.agents.clone())
        } else {
            LocalProcessBridge::with_search_paths(config.agents.clone(), config.search_paths.clone())
        };

        Self::new(config, Arc::new(bridge))
    }

    /// Build a local app from the user's `config.json`, or defaults
    pub fn from_default_config() -> Self {
        Self::local(Config::load_or_default())
    }

    /// Detect agents and open a first session on the first available one
    pub async fn initialize(&self) -> Result<Session> {
        let agents = self.agents.refresh_agents(None).await;

        if let Some(session) = self.sessions.active_session() {
            return Ok(session);
        }

        let tool_type = agents
            .iter()
            .find(|a| a.available)
            .or_else(|| agents.first())
            .map(|a| a.id.clone())
            .or_else(|| self.config.agents.first().map(|a| a.id.clone()))
            .unwrap_or_else(|| "terminal".to_string());

        let session = Session::new("Default".to_string(), tool_type)?;
        self.sessions.add_session(session.clone())?;
        self.sessions.set_active_session(&session.id)?;

        tracing::info!(
            session_id = %session.id,
            tool_type = %session.tool_type,
            "Conductor initialized"
        );

        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            sessions: self.sessions.clone(),
            agents: self.agents.clone(),
        }
    }
}
