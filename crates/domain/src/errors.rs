//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Melodex
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MelodexError {
    /// Missing or invalid deployment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No session or access token present
    #[error("Not authenticated")]
    Unauthenticated,

    /// Token refresh was attempted and failed; the session has been destroyed
    #[error("Session expired")]
    SessionExpired,

    /// Failure talking to the upstream music or token API
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Melodex operations
pub type Result<T> = std::result::Result<T, MelodexError>;
