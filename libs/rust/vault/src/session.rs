//! Login session persisted in the token file.
//!
//! `login` writes the server address and access token; every other command
//! reads them back. The file is JSON and, on unix, readable by its owner only.

use crate::{
    endpoint::Endpoints,
    error::{VaultError, VaultResult},
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

/// Directory under the home directory holding CLI state.
pub const DATA_DIR_NAME: &str = "cryptocli.data";

/// Token file name used when none is given.
pub const DEFAULT_TOKEN_FILENAME: &str = "crypto_token.txt";

#[derive(Serialize, Deserialize)]
struct TokenFileRecord {
    server: String,
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cacert: Option<PathBuf>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Server address and access token obtained at login.
pub struct Session {
    server: String,
    access_token: SecretString,
    cacert: Option<PathBuf>,
    created_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.server)
            .field("access_token", &"[REDACTED]")
            .field("cacert", &self.cacert)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Session {
    /// Create a session stamped with the current time.
    #[must_use]
    pub fn new(
        server: impl Into<String>,
        access_token: SecretString,
        cacert: Option<PathBuf>,
    ) -> Self {
        Self {
            server: server.into(),
            access_token,
            cacert,
            created_at: Utc::now(),
        }
    }

    /// Vault server address (`host` or `host:port`).
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Access token sent as `X-TOKEN-AUTH`.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// CA certificate file recorded at login.
    #[must_use]
    pub fn cacert(&self) -> Option<&Path> {
        self.cacert.as_deref()
    }

    /// When the session was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Endpoints for this session's server.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidServer`] for an unusable address.
    pub fn endpoints(&self) -> VaultResult<Endpoints> {
        Endpoints::for_server(&self.server)
    }

    /// Read a session from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::SessionNotFound`] when the file is missing and
    /// [`VaultError::InvalidSession`] when it is not a usable token file.
    pub fn load(path: &Path) -> VaultResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VaultError::SessionNotFound(path.to_path_buf()),
            _ => VaultError::Io(e),
        })?;

        let record: TokenFileRecord = serde_json::from_str(&raw)
            .map_err(|e| VaultError::invalid_session(e.to_string()))?;

        if record.server.trim().is_empty() {
            return Err(VaultError::invalid_session("server address is empty"));
        }
        if record.access_token.trim().is_empty() {
            return Err(VaultError::invalid_session("access token is empty"));
        }

        debug!(path = %path.display(), server = %record.server, "Loaded session");
        Ok(Self {
            server: record.server,
            access_token: SecretString::from(record.access_token),
            cacert: record.cacert,
            created_at: record.created_at.unwrap_or_else(Utc::now),
        })
    }

    /// Write the session to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> VaultResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }

        let record = TokenFileRecord {
            server: self.server.clone(),
            access_token: self.access_token.expose_secret().to_string(),
            cacert: self.cacert.clone(),
            created_at: Some(self.created_at),
        };
        let contents = serde_json::to_vec_pretty(&record)?;
        let mut file = create_owner_only(path)?;
        // An existing file keeps its mode on open.
        restrict_to_owner(path)?;
        file.write_all(&contents)?;
        file.sync_all()?;

        debug!(path = %path.display(), "Saved session");
        Ok(())
    }

    /// Delete the token file at `path`. Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] for failures other than a missing file.
    pub fn remove(path: &Path) -> VaultResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// `$HOME/cryptocli.data`, created if missing.
///
/// # Errors
///
/// Returns [`VaultError::NoHomeDir`] or an I/O error.
pub fn data_dir() -> VaultResult<PathBuf> {
    let dir = dirs::home_dir().ok_or(VaultError::NoHomeDir)?.join(DATA_DIR_NAME);
    create_dir(&dir)?;
    Ok(dir)
}

/// Token file used when neither a flag nor the config names one.
///
/// # Errors
///
/// See [`data_dir`].
pub fn default_token_file() -> VaultResult<PathBuf> {
    Ok(data_dir()?.join(DEFAULT_TOKEN_FILENAME))
}

fn create_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

fn create_owner_only(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}
