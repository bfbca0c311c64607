//! Conductor configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use conductor_bridge::{default_agents, AgentDefinition};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Agents looked for during detection
    pub agents: Vec<AgentDefinition>,
    /// Directories searched for agent binaries; `PATH` when empty
    pub search_paths: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&contents)?;

        if config.agents.iter().any(|a| a.binary_name.trim().is_empty()) {
            return Err(CoreError::Config(
                "agent binary_name cannot be empty".to_string(),
            ));
        }

        tracing::debug!(path = %path.display(), agents = config.agents.len(), "Loaded config");

        Ok(config)
    }

    /// Load `config.json` from the data directory, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(Self::default_path())
    }

    /// Load `path` if it exists. A missing or unreadable file yields defaults.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn default_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    pub fn data_dir() -> PathBuf {
        data_local_dir()
            .map(|d| d.join("Conductor"))
            .unwrap_or_else(|| PathBuf::from(".conductor"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            agents: default_agents(),
            search_paths: Vec::new(),
        }
    }
}

/// Per-user application data root
fn data_local_dir() -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "windows") {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home().map(|h| h.join("Library/Application Support"))
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home().map(|h| h.join(".local/share")))
    }
}
