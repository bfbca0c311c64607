//! Process-control boundary

use async_trait::async_trait;

use crate::agent::AgentConfig;
use crate::Result;

/// Suffix of a session's main agent process
pub const DEFAULT_PROCESS_SUFFIX: &str = "ai";

/// Name of the process a session runs under `suffix`.
///
/// `process_name("abc", None)` is `"abc-ai"`; `process_name("abc", Some("terminal"))`
/// is `"abc-terminal"`.
pub fn process_name(session_id: &str, suffix: Option<&str>) -> String {
    format!("{}-{}", session_id, suffix.unwrap_or(DEFAULT_PROCESS_SUFFIX))
}

/// Process lifecycle actions the orchestration layer relies on.
///
/// Implementations are shared behind an `Arc` and must tolerate concurrent
/// calls for different processes.
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Detect installed agents, locally or on `ssh_remote_id`.
    async fn detect_agents(&self, ssh_remote_id: Option<&str>) -> Result<Vec<AgentConfig>>;

    /// Kill a process by name. Succeeds when no such process exists.
    async fn kill(&self, process_name: &str) -> Result<()>;

    /// Interrupt (Ctrl-C) a process by name.
    async fn interrupt(&self, process_name: &str) -> Result<()>;

    /// Acknowledge that the agent error of `session_id` has been handled.
    async fn clear_error(&self, session_id: &str) -> Result<()>;
}
