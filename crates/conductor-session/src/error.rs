//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error("Session name cannot be empty")]
    EmptyName,
}
