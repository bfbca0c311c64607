//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session error: {0}")]
    Session(#[from] conductor_session::SessionError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] conductor_bridge::BridgeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
