//! Local process bridge
//!
//! Runs agents as child processes of the current host and keeps their
//! handles in a registry keyed by process name (`<sessionId>-<suffix>`).

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};

use crate::agent::{AgentConfig, AgentDefinition};
use crate::error::BridgeError;
use crate::process::ProcessControl;
use crate::Result;

pub struct LocalProcessBridge {
    /// Running children by process name
    processes: Arc<RwLock<HashMap<String, Child>>>,
    /// Agents to look for during detection
    agents: Vec<AgentDefinition>,
    /// Directories searched for agent binaries
    search_paths: Vec<PathBuf>,
    /// Sessions whose agent error has been acknowledged, until their next spawn or kill
    acknowledged: Arc<RwLock<HashSet<String>>>,
}

impl LocalProcessBridge {
    /// Create a bridge that searches `PATH` for `agents`
    pub fn new(agents: Vec<AgentDefinition>) -> Self {
        let search_paths = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();

        Self::with_search_paths(agents, search_paths)
    }

    pub fn with_search_paths(agents: Vec<AgentDefinition>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            processes: Arc::new(RwLock::new(HashMap::new())),
            agents,
            search_paths,
            acknowledged: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Spawn `program` and register it under `name`
    pub fn spawn(&self, name: &str, program: &str, args: &[String]) -> Result<u32> {
        if self.reap_if_exited(name) {
            return Err(BridgeError::AlreadyRunning(name.to_string()));
        }

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let pid = child.id().unwrap_or_default();
        self.processes.write().insert(name.to_string(), child);
        self.forget_acknowledgement(name);

        tracing::info!(process = %name, program = %program, pid, "Spawned agent process");

        Ok(pid)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.reap_if_exited(name)
    }

    /// Drop the registry entry for `name` if the child has exited.
    ///
    /// Returns true while a live child is registered under `name`.
    fn reap_if_exited(&self, name: &str) -> bool {
        let mut processes = self.processes.write();
        let Some(child) = processes.get_mut(name) else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                processes.remove(name);
                tracing::info!(process = %name, %status, "Agent process exited");
                false
            }
            Err(e) => {
                processes.remove(name);
                tracing::warn!(process = %name, "Could not poll agent process: {}", e);
                false
            }
        }
    }

    /// A new run of a session's process starts with no acknowledged error
    fn forget_acknowledgement(&self, process_name: &str) {
        if let Some((session_id, _suffix)) = process_name.rsplit_once('-') {
            self.acknowledged.write().remove(session_id);
        }
    }

    pub fn is_acknowledged(&self, session_id: &str) -> bool {
        self.acknowledged.read().contains(session_id)
    }

    async fn find_binary(&self, binary_name: &str) -> Option<PathBuf> {
        for dir in &self.search_paths {
            for candidate in binary_candidates(dir, binary_name) {
                if let Ok(meta) = tokio::fs::metadata(&candidate).await {
                    if meta.is_file() && is_executable(&meta) {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}

#[async_trait]
impl ProcessControl for LocalProcessBridge {
    async fn detect_agents(&self, ssh_remote_id: Option<&str>) -> Result<Vec<AgentConfig>> {
        if let Some(remote) = ssh_remote_id {
            return Err(BridgeError::RemoteUnsupported(remote.to_string()));
        }

        let mut detected = Vec::with_capacity(self.agents.len());
        for definition in &self.agents {
            let path = self.find_binary(&definition.binary_name).await;
            detected.push(AgentConfig::detected(definition, path));
        }

        tracing::debug!(
            available = detected.iter().filter(|a| a.available).count(),
            total = detected.len(),
            "Detected agents"
        );

        Ok(detected)
    }

    async fn kill(&self, process_name: &str) -> Result<()> {
        // Take the handle out first; the lock must not be held across the await
        let child = self.processes.write().remove(process_name);
        self.forget_acknowledgement(process_name);

        let Some(mut child) = child else {
            tracing::debug!(process = %process_name, "Kill requested for unknown process");
            return Ok(());
        };

        match child.kill().await {
            Ok(()) => {}
            // Already exited on its own
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!(process = %process_name, "Killed agent process");
        Ok(())
    }

    async fn interrupt(&self, process_name: &str) -> Result<()> {
        // An exited child must not be signalled through its stale pid
        if !self.reap_if_exited(process_name) {
            return Err(BridgeError::ProcessNotFound(process_name.to_string()));
        }

        let pid = self
            .processes
            .read()
            .get(process_name)
            .and_then(|child| child.id())
            .ok_or_else(|| BridgeError::ProcessNotFound(process_name.to_string()))?;

        send_interrupt(pid)?;

        tracing::debug!(process = %process_name, pid, "Interrupted agent process");
        Ok(())
    }

    async fn clear_error(&self, session_id: &str) -> Result<()> {
        self.acknowledged.write().insert(session_id.to_string());
        tracing::info!(session_id = %session_id, "Agent error acknowledged");
        Ok(())
    }
}

impl Clone for LocalProcessBridge {
    fn clone(&self) -> Self {
        Self {
            processes: Arc::clone(&self.processes),
            agents: self.agents.clone(),
            search_paths: self.search_paths.clone(),
            acknowledged: Arc::clone(&self.acknowledged),
        }
    }
}

#[cfg(unix)]
fn send_interrupt(pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = i32::try_from(pid)
        .map_err(|_| BridgeError::Signal(format!("pid out of range: {pid}")))?;
    kill(Pid::from_raw(pid), Signal::SIGINT).map_err(|e| BridgeError::Signal(e.to_string()))
}

#[cfg(not(unix))]
fn send_interrupt(_pid: u32) -> Result<()> {
    Err(BridgeError::Unsupported("interrupt"))
}

fn binary_candidates(dir: &Path, binary_name: &str) -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![
            dir.join(format!("{binary_name}.exe")),
            dir.join(format!("{binary_name}.cmd")),
        ]
    } else {
        vec![dir.join(binary_name)]
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<AgentDefinition> {
        vec![
            AgentDefinition::new("claude-code", "Claude Code", "claude"),
            AgentDefinition::new("codex", "Codex", "codex"),
        ]
    }

    #[tokio::test]
    async fn test_kill_unknown_process_is_ok() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge.kill("session-1-ai").await.unwrap();
    }

    #[tokio::test]
    async fn test_interrupt_unknown_process_fails() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        let result = bridge.interrupt("session-1-ai").await;
        assert!(matches!(result, Err(BridgeError::ProcessNotFound(_))));
    }

    #[tokio::test]
    async fn test_remote_detection_rejected() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        let result = bridge.detect_agents(Some("build-box")).await;
        assert!(matches!(result, Err(BridgeError::RemoteUnsupported(_))));
    }

    #[tokio::test]
    async fn test_clear_error_is_recorded() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge.clear_error("session-1").await.unwrap();
        assert!(bridge.is_acknowledged("session-1"));
        assert!(!bridge.is_acknowledged("session-2"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_detect_agents_on_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("claude");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Present but not executable
        std::fs::write(dir.path().join("codex"), "").unwrap();

        let bridge =
            LocalProcessBridge::with_search_paths(definitions(), vec![dir.path().to_path_buf()]);
        let agents = bridge.detect_agents(None).await.unwrap();

        assert_eq!(agents.len(), 2);
        assert!(agents[0].available);
        assert_eq!(agents[0].path.as_deref(), Some(binary.as_path()));
        assert!(!agents[1].available);
        assert!(agents[1].path.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_interrupt_and_kill() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge
            .spawn("session-1-ai", "sleep", &["30".to_string()])
            .unwrap();
        assert!(bridge.is_running("session-1-ai"));

        // A second process under the same name is refused
        let again = bridge.spawn("session-1-ai", "sleep", &["30".to_string()]);
        assert!(matches!(again, Err(BridgeError::AlreadyRunning(_))));

        bridge.interrupt("session-1-ai").await.unwrap();
        bridge.kill("session-1-ai").await.unwrap();
        assert!(!bridge.is_running("session-1-ai"));

        // Killing twice is fine
        bridge.kill("session-1-ai").await.unwrap();
    }

    #[cfg(unix)]
    async fn wait_for_exit(bridge: &LocalProcessBridge, name: &str) {
        for _ in 0..100 {
            if !bridge.is_running(name) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        panic!("{name} did not exit");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_respawn_after_natural_exit() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge.spawn("session-1-ai", "true", &[]).unwrap();

        wait_for_exit(&bridge, "session-1-ai").await;
        assert!(!bridge.is_running("session-1-ai"));

        // The crashed agent can be started again under the same name
        bridge.spawn("session-1-ai", "sleep", &["30".to_string()]).unwrap();
        assert!(bridge.is_running("session-1-ai"));
        bridge.kill("session-1-ai").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_interrupt_exited_process_fails() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge.spawn("session-1-ai", "true", &[]).unwrap();

        // Still registered: nothing has polled the child since it exited
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(bridge.processes.read().contains_key("session-1-ai"));

        let result = bridge.interrupt("session-1-ai").await;
        assert!(matches!(result, Err(BridgeError::ProcessNotFound(_))));
        assert!(!bridge.processes.read().contains_key("session-1-ai"));
    }

    #[tokio::test]
    async fn test_kill_forgets_acknowledgement() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge.clear_error("session-1").await.unwrap();
        bridge.clear_error("session-2").await.unwrap();

        bridge.kill("session-1-ai").await.unwrap();
        assert!(!bridge.is_acknowledged("session-1"));
        assert!(bridge.is_acknowledged("session-2"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_forgets_acknowledgement() {
        let bridge = LocalProcessBridge::with_search_paths(definitions(), Vec::new());
        bridge.clear_error("session-1").await.unwrap();

        bridge
            .spawn("session-1-ai", "sleep", &["30".to_string()])
            .unwrap();
        assert!(!bridge.is_acknowledged("session-1"));
        bridge.kill("session-1-ai").await.unwrap();
    }
}
