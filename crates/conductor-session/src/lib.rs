//! Conductor Session Model
//!
//! A session is one unit of agent-assisted work: a lifecycle state, an
//! input mode, and one or more AI tabs. The store keeps every session in
//! memory and hands out copies; all writes go through its update functions.

mod agent_error;
mod error;
mod session;
mod state;
mod store;
mod tab;

pub use agent_error::{AgentError, AgentErrorKind};
pub use error::SessionError;
pub use session::Session;
pub use state::{InputMode, SessionState};
pub use store::SessionStore;
pub use tab::{AiTab, NewTabOptions};

pub type Result<T> = std::result::Result<T, SessionError>;
