//! Agent error descriptor
//!
//! Reported by the bridge when an agent process fails in a way the user has
//! to act on (expired login, exhausted context, crash).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentErrorKind {
    AuthExpired,
    TokenExhaustion,
    RateLimited,
    NetworkError,
    AgentCrashed,
    PermissionDenied,
    Unknown,
}

impl AgentErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentErrorKind::AuthExpired => "auth_expired",
            AgentErrorKind::TokenExhaustion => "token_exhaustion",
            AgentErrorKind::RateLimited => "rate_limited",
            AgentErrorKind::NetworkError => "network_error",
            AgentErrorKind::AgentCrashed => "agent_crashed",
            AgentErrorKind::PermissionDenied => "permission_denied",
            AgentErrorKind::Unknown => "unknown",
        }
    }

    fn is_recoverable_by_default(&self) -> bool {
        matches!(
            self,
            AgentErrorKind::RateLimited
                | AgentErrorKind::NetworkError
                | AgentErrorKind::AgentCrashed
        )
    }
}

impl std::fmt::Display for AgentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentError {
    pub kind: AgentErrorKind,
    /// Human-readable message shown in the error banner
    pub message: String,
    /// Whether a retry can succeed without user action
    pub recoverable: bool,
    /// Agent that produced the error
    pub agent_id: String,
    /// Agent-side session id, when the agent reported one
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Raw payload from the agent output, kept for diagnostics
    pub raw: Option<serde_json::Value>,
}

impl AgentError {
    pub fn new(
        kind: AgentErrorKind,
        agent_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            recoverable: kind.is_recoverable_by_default(),
            agent_id: agent_id.into(),
            session_id: None,
            timestamp: Utc::now(),
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}
