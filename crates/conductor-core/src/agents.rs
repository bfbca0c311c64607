//! Agent Store
//!
//! Error-recovery and process actions for agent sessions. Every action
//! follows the same shape: reset fields on one session, then at most one
//! bridge call at a time. Bridge failures here are expected (the process
//! may already be gone) and are logged, never returned.

use parking_lot::RwLock;
use std::sync::Arc;

use conductor_bridge::{process_name, AgentConfig, ProcessControl};
use conductor_session::{InputMode, NewTabOptions, Session, SessionStore};

pub struct AgentStore {
    /// Session collection shared with the rest of the app
    sessions: SessionStore,
    /// Process-control boundary
    bridge: Arc<dyn ProcessControl>,
    /// Agents found by the last successful detection
    available_agents: Arc<RwLock<Vec<AgentConfig>>>,
    agents_detected: Arc<RwLock<bool>>,
}

impl AgentStore {
    pub fn new(sessions: SessionStore, bridge: Arc<dyn ProcessControl>) -> Self {
        Self {
            sessions,
            bridge,
            available_agents: Arc::new(RwLock::new(Vec::new())),
            agents_detected: Arc::new(RwLock::new(false)),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    // === Agent detection ===

    /// Re-run agent detection, locally or on `ssh_remote_id`.
    ///
    /// On failure the previous list is kept.
    pub async fn refresh_agents(&self, ssh_remote_id: Option<&str>) -> Vec<AgentConfig> {
        match self.bridge.detect_agents(ssh_remote_id).await {
            Ok(agents) => {
                tracing::info!(
                    count = agents.len(),
                    remote = ssh_remote_id.unwrap_or("local"),
                    "Agents detected"
                );
                *self.available_agents.write() = agents.clone();
                *self.agents_detected.write() = true;
                agents
            }
            Err(e) => {
                tracing::warn!(
                    remote = ssh_remote_id.unwrap_or("local"),
                    "Agent detection failed: {}",
                    e
                );
                self.available_agents()
            }
        }
    }

    pub fn available_agents(&self) -> Vec<AgentConfig> {
        self.available_agents.read().clone()
    }

    pub fn agents_detected(&self) -> bool {
        *self.agents_detected.read()
    }

    pub fn get_agent_config(&self, agent_id: &str) -> Option<AgentConfig> {
        self.available_agents
            .read()
            .iter()
            .find(|a| a.id == agent_id)
            .cloned()
    }

    // === Error recovery ===

    /// Clear the agent error on a session and return it to idle.
    ///
    /// Returns the updated session, or `None` when no session has this id
    /// (nothing is changed and the bridge is not called).
    pub async fn clear_agent_error(
        &self,
        session_id: &str,
        tab_id: Option<&str>,
    ) -> Option<Session> {
        let session = self.reset_error(session_id, tab_id)?;

        if let Err(e) = self.bridge.clear_error(session_id).await {
            tracing::debug!(session_id = %session_id, "Error acknowledgement failed: {}", e);
        }

        Some(session)
    }

    /// Clear the error and open a fresh AI tab for a new conversation
    pub async fn start_new_session_after_error(
        &self,
        session_id: &str,
        options: NewTabOptions,
    ) -> Option<Session> {
        self.clear_agent_error(session_id, None).await?;

        let session = self
            .sessions
            .update_session(session_id, |s| {
                s.add_tab(options);
            })
            .ok()?;

        tracing::info!(
            session_id = %session_id,
            tab_id = session.active_tab_id.as_deref().unwrap_or_default(),
            "Started new conversation after error"
        );

        Some(session)
    }

    /// Clear the error so the user can resend their last message
    pub async fn retry_after_error(&self, session_id: &str) -> Option<Session> {
        self.clear_agent_error(session_id, None).await
    }

    /// Clear the error and kill the agent so the next message respawns it
    pub async fn restart_agent_after_error(&self, session_id: &str) -> Option<Session> {
        let session = self.clear_agent_error(session_id, None).await?;
        self.kill_process(&process_name(session_id, None)).await;
        Some(session)
    }

    /// Clear the error and drop the user into the session's terminal to log in
    pub async fn authenticate_after_error(&self, session_id: &str) -> Option<Session> {
        self.clear_agent_error(session_id, None).await?;

        let session = self
            .sessions
            .update_session(session_id, |s| s.input_mode = InputMode::Terminal)
            .ok()?;

        if let Err(e) = self.sessions.set_active_session(session_id) {
            tracing::debug!(session_id = %session_id, "Could not activate session: {}", e);
        }

        Some(session)
    }

    // === Process control ===

    /// Kill a session's process: `<sessionId>-ai`, or `<sessionId>-<suffix>`
    pub async fn kill_agent(&self, session_id: &str, suffix: Option<&str>) {
        if !self.sessions.contains(session_id) {
            tracing::debug!(session_id = %session_id, "Kill skipped, no such session");
            return;
        }

        self.kill_process(&process_name(session_id, suffix)).await;
    }

    /// Send an interrupt to a session's main agent process
    pub async fn interrupt_agent(&self, session_id: &str) {
        if !self.sessions.contains(session_id) {
            tracing::debug!(session_id = %session_id, "Interrupt skipped, no such session");
            return;
        }

        let name = process_name(session_id, None);
        if let Err(e) = self.bridge.interrupt(&name).await {
            tracing::debug!(process = %name, "Interrupt failed: {}", e);
        }
    }

    fn reset_error(&self, session_id: &str, tab_id: Option<&str>) -> Option<Session> {
        match self
            .sessions
            .update_session(session_id, |s| s.clear_agent_error(tab_id))
        {
            Ok(session) => {
                tracing::debug!(session_id = %session_id, "Cleared agent error");
                Some(session)
            }
            Err(e) => {
                tracing::debug!("Clear error skipped: {}", e);
                None
            }
        }
    }

    async fn kill_process(&self, name: &str) {
        if let Err(e) = self.bridge.kill(name).await {
            tracing::debug!(process = %name, "Kill failed: {}", e);
        }
    }
}

impl Clone for AgentStore {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            bridge: Arc::clone(&self.bridge),
            available_agents: Arc::clone(&self.available_agents),
            agents_detected: Arc::clone(&self.agents_detected),
        }
    }
}
