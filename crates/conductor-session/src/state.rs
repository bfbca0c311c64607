//! Session lifecycle state
//!
//! ```text
//! Idle ──send──▶ Busy ──done──▶ Idle
//!   │              │
//!   │              └─agent error─▶ Error ──clear──▶ Idle
//!   └─remote──▶ Connecting ──ready──▶ Idle
//! ```
//!
//! `Waiting` covers an agent that is blocked on user input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Agent is ready for input
    #[default]
    Idle,
    /// Agent is working on a request
    Busy,
    /// Agent is waiting on the user
    Waiting,
    /// Remote agent is still connecting
    Connecting,
    /// Agent reported an error and is paused
    Error,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Busy => "busy",
            SessionState::Waiting => "waiting",
            SessionState::Connecting => "connecting",
            SessionState::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SessionState::Idle),
            "busy" => Ok(SessionState::Busy),
            "waiting" => Ok(SessionState::Waiting),
            "connecting" => Ok(SessionState::Connecting),
            "error" => Ok(SessionState::Error),
            _ => Err(format!("Unknown session state: {}", s)),
        }
    }
}

/// Where keyboard input in a session is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Ai,
    Terminal,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Ai => "ai",
            InputMode::Terminal => "terminal",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_str() {
        for state in [
            SessionState::Idle,
            SessionState::Busy,
            SessionState::Waiting,
            SessionState::Connecting,
            SessionState::Error,
        ] {
            assert_eq!(state.as_str().parse::<SessionState>().unwrap(), state);
        }
        assert!("sleeping".parse::<SessionState>().is_err());
    }

    #[test]
    fn test_serde_is_lowercase() {
        let json = serde_json::to_string(&SessionState::Connecting).unwrap();
        assert_eq!(json, "\"connecting\"");

        let mode: InputMode = serde_json::from_str("\"terminal\"").unwrap();
        assert_eq!(mode, InputMode::Terminal);
    }
}
