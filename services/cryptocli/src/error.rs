//! CLI errors and their exit codes.

use std::{path::PathBuf, process::ExitCode};
use thiserror::Error;
use vault_client::{ConfigError, VaultError};

/// Exit code for invalid flags, request building and local files.
pub const EXIT_INVALID_INPUT: u8 = 1;
/// Exit code for an error reported by the vault.
pub const EXIT_SERVER_ERROR: u8 = 3;
/// Exit code when no usable reply was received.
pub const EXIT_TRANSPORT: u8 = 4;
/// Exit code for an empty 404 reply.
pub const EXIT_DENIED: u8 = 5;

/// Failure of a single command run.
#[derive(Error, Debug)]
pub enum CliError {
    /// Parameter written with a single dash, e.g. `-policyName`
    #[error("Invalid parameter {0:?}. Parameter names must be prefixed with --\nE.g. -{0}")]
    SingleDashParameter(String),

    /// Flag values rejected before sending
    #[error("{0}")]
    InvalidInput(String),

    /// Request body could not be built
    #[error("Error building JSON request: {0}")]
    Json(#[from] serde_json::Error),

    /// Token file missing or unusable
    #[error(
        "Error getting Server information from {}. {source}.\nIf you are not logged in yet, log into the vault by running login command.",
        path.display()
    )]
    Session {
        /// Token file that was read
        path: PathBuf,
        /// Why it could not be used
        source: VaultError,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Vault replied with an error; holds the reply body
    #[error("{0}")]
    Server(String),

    /// Vault replied with an empty 404
    #[error("{0}")]
    Denied(String),

    /// Request did not produce a usable reply
    #[error("HTTP request failed: {0}")]
    Transport(VaultError),

    /// Local failure inside the vault client
    #[error(transparent)]
    Vault(VaultError),
}

impl CliError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Numeric exit status.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Server(_) => EXIT_SERVER_ERROR,
            Self::Transport(_) => EXIT_TRANSPORT,
            Self::Denied(_) => EXIT_DENIED,
            Self::SingleDashParameter(_)
            | Self::InvalidInput(_)
            | Self::Json(_)
            | Self::Session { .. }
            | Self::Config(_)
            | Self::Vault(_) => EXIT_INVALID_INPUT,
        }
    }

    /// Process exit code.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl From<VaultError> for CliError {
    fn from(err: VaultError) -> Self {
        if err.is_transport() {
            return Self::Transport(err);
        }
        match err {
            VaultError::InvalidInput(msg) => Self::InvalidInput(msg),
            VaultError::MissingAccessToken => Self::Server(VaultError::MissingAccessToken.to_string()),
            err => Self::Vault(err),
        }
    }
}
