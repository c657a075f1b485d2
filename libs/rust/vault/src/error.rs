//! Vault error types using thiserror 2.0.
//!
//! Errors are split into transport failures (no usable reply) and local
//! failures (bad input, session or configuration problems).

use crate::config::ConfigError;
use cryptocli_common::PlatformError;
use std::path::PathBuf;
use thiserror::Error;

/// Vault client errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Server address cannot form a valid endpoint
    #[error("Invalid server address {0:?}")]
    InvalidServer(String),

    /// Request did not complete
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success reply where a body was required
    #[error("Status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Reply body
        body: String,
    },

    /// Token file does not exist
    #[error("Token file {} not found", .0.display())]
    SessionNotFound(PathBuf),

    /// Token file exists but cannot be used
    #[error("Invalid token file: {0}")]
    InvalidSession(String),

    /// Login reply carried no access token
    #[error("Login reply did not contain an access token")]
    MissingAccessToken,

    /// Home directory could not be determined
    #[error("Cannot determine the home directory")]
    NoHomeDir,

    /// Request input rejected before sending
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local file error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Platform error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check if the error happened on the wire.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Status { .. } => true,
            Self::Platform(e) => e.is_transport(),
            _ => false,
        }
    }

    /// Create an invalid session error.
    #[must_use]
    pub fn invalid_session(msg: impl Into<String>) -> Self {
        Self::InvalidSession(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
