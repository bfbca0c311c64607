//! Bridge error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Process already running: {0}")]
    AlreadyRunning(String),

    #[error("Remote host not supported by this bridge: {0}")]
    RemoteUnsupported(String),

    #[error("Operation not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("Signal error: {0}")]
    Signal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
