//! Conductor Process Bridge
//!
//! The boundary through which the editor asks for process lifecycle
//! actions: detect installed agents, kill or interrupt a running agent,
//! acknowledge an agent error.

mod agent;
mod error;
mod local;
mod process;

pub use agent::{default_agents, AgentConfig, AgentDefinition};
pub use error::BridgeError;
pub use local::LocalProcessBridge;
pub use process::{process_name, ProcessControl, DEFAULT_PROCESS_SUFFIX};

pub type Result<T> = std::result::Result<T, BridgeError>;
