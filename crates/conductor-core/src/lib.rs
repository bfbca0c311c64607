//! Conductor Core
//!
//! Orchestration layer between the session store and the process bridge.
//! Hosts construct an [`App`] and pass it to whatever drives the UI; there
//! is no global state.

mod agents;
mod app;
mod config;
mod error;
mod platform;

pub use agents::AgentStore;
pub use app::App;
pub use config::Config;
pub use error::CoreError;
pub use platform::{platform_label, Platform};

// Re-export core components
pub use conductor_bridge::{
    default_agents, process_name, AgentConfig, AgentDefinition, BridgeError, LocalProcessBridge,
    ProcessControl, DEFAULT_PROCESS_SUFFIX,
};
pub use conductor_session::{
    AgentError, AgentErrorKind, AiTab, InputMode, NewTabOptions, Session, SessionError,
    SessionState, SessionStore,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(true).init();
}
