//! Client configuration.
//!
//! Layered from an optional TOML file (`--config` or `$HOME/cryptocli.cfg`)
//! and `CRYPTOCLI_*` environment variables, after loading a local `.env`.

use crate::{error::VaultResult, session};
use cryptocli_common::{HttpConfig, TracingConfig};
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Config file looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = "cryptocli.cfg";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "CRYPTOCLI";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Timeout of zero seconds
    #[error("Invalid {field}: must be greater than 0")]
    InvalidTimeout {
        /// Offending key
        field: &'static str,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Token file to use instead of the default
    pub token_file: Option<PathBuf>,
    /// CA certificate used when the token file records none
    pub cacert: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_file: None,
            cacert: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            log_level: "warn".to_string(),
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Load from `explicit` (required when given) or the home config file,
    /// then the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is missing or malformed, or a value is
    /// invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        match explicit {
            Some(path) => Self::from_sources(Some((path, true)), None),
            None => {
                let home = dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE));
                Self::from_home_file(home.as_deref(), None)
            }
        }
    }

    /// Like [`Self::from_sources`] with an optional file that is skipped when
    /// it cannot be read or parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment holds an invalid value.
    pub fn from_home_file(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::from_sources(None, env);
        };
        match Self::from_sources(Some((path, false)), env.clone()) {
            Err(ConfigError::Load(_)) => Self::from_sources(None, env),
            result => result,
        }
    }

    /// Build from a file and an environment map standing in for the process
    /// environment (`None` reads the real one).
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn from_sources(
        file: Option<(&Path, bool)>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some((path, required)) = file {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            );
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] for zero timeouts.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                field: "timeout_secs",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                field: "connect_timeout_secs",
            });
        }
        Ok(())
    }

    /// Token file to use: `flag`, then the configured one, then the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the default location cannot be created.
    pub fn token_file_path(&self, flag: Option<&Path>) -> VaultResult<PathBuf> {
        match flag.or(self.token_file.as_deref()) {
            Some(path) => Ok(path.to_path_buf()),
            None => session::default_token_file(),
        }
    }

    /// HTTP settings without TLS roots; see [`crate::VaultClient::connect`].
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }

    /// Tracing settings.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig::default()
            .with_log_level(self.log_level.clone())
            .with_json_output(self.log_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ClientConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.http_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cryptocli.cfg");
        std::fs::write(
            &path,
            "timeout_secs = 45\ncacert = \"/etc/vault/ca.pem\"\nlog_level = \"info\"\n",
        )
        .unwrap();

        let config = ClientConfig::from_sources(
            Some((path.as_path(), true)),
            env(&[("CRYPTOCLI_TIMEOUT_SECS", "90"), ("CRYPTOCLI_LOG_JSON", "true")]),
        )
        .unwrap();

        assert_eq!(config.timeout_secs, 90);
        assert_eq!(config.cacert, Some(PathBuf::from("/etc/vault/ca.pem")));
        assert_eq!(config.log_level, "info");
        assert!(config.log_json);
    }

    #[test]
    fn test_optional_file_may_be_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.cfg");

        assert!(ClientConfig::from_sources(Some((path.as_path(), false)), env(&[])).is_ok());
        assert!(matches!(
            ClientConfig::from_sources(Some((path.as_path(), true)), env(&[])),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_malformed_home_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cryptocli.cfg");
        std::fs::write(&path, "timeout_secs = [not toml").unwrap();

        let config =
            ClientConfig::from_home_file(Some(&path), env(&[("CRYPTOCLI_LOG_LEVEL", "debug")]))
                .unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level, "debug");

        assert!(matches!(
            ClientConfig::from_sources(Some((path.as_path(), true)), env(&[])),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_home_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cryptocli.cfg");
        std::fs::write(&path, "timeout_secs = 12\n").unwrap();

        let config = ClientConfig::from_home_file(Some(&path), env(&[])).unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert!(ClientConfig::from_home_file(None, env(&[])).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ClientConfig::from_sources(None, env(&[("CRYPTOCLI_TIMEOUT_SECS", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidTimeout { field: "timeout_secs" })
        ));
    }

    #[test]
    fn test_token_file_precedence() {
        let config = ClientConfig {
            token_file: Some(PathBuf::from("/from/config")),
            ..ClientConfig::default()
        };

        assert_eq!(
            config.token_file_path(Some(Path::new("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            config.token_file_path(None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
