//! Agent descriptors

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Static description of an agent the editor knows how to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    /// Executable looked up on the search path
    pub binary_name: String,
}

impl AgentDefinition {
    pub fn new(id: &str, name: &str, binary_name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            binary_name: binary_name.to_string(),
        }
    }
}

/// An agent as seen by detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub binary_name: String,
    pub available: bool,
    /// Resolved executable, when found
    pub path: Option<PathBuf>,
}

impl AgentConfig {
    pub fn detected(definition: &AgentDefinition, path: Option<PathBuf>) -> Self {
        Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            binary_name: definition.binary_name.clone(),
            available: path.is_some(),
            path,
        }
    }
}

pub fn default_agents() -> Vec<AgentDefinition> {
    vec![
        AgentDefinition::new("claude-code", "Claude Code", "claude"),
        AgentDefinition::new("codex", "Codex", "codex"),
        AgentDefinition::new("opencode", "OpenCode", "opencode"),
        AgentDefinition::new("terminal", "Terminal", "bash"),
    ]
}
