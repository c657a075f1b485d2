//! Centralized HTTP client configuration and building.
//!
//! Every vault call goes through a client built here: rustls TLS, bounded
//! timeouts and, when the vault uses a private CA, that CA as a trust root.

use crate::PlatformError;
use reqwest::{Certificate, Client, ClientBuilder};
use std::time::Duration;

const PEM_CERT_MARKER: &str = "-----BEGIN CERTIFICATE-----";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// PEM encoded CA bundle added as trust roots
    pub ca_cert_pem: Option<Vec<u8>>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("cryptocli/", env!("CARGO_PKG_VERSION")).to_string(),
            ca_cert_pem: None,
        }
    }
}

impl HttpConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Trust the given PEM encoded CA certificate(s).
    #[must_use]
    pub fn with_ca_cert_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_cert_pem = Some(pem.into());
        self
    }
}

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns [`PlatformError::Tls`] if the CA bundle holds no PEM certificate
/// and [`PlatformError::Http`] if the client cannot be built.
///
/// # Examples
///
/// ```
/// use cryptocli_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default().with_timeout(Duration::from_secs(60));
/// assert!(build_http_client(&config).is_ok());
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, PlatformError> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .use_rustls_tls();

    if let Some(pem) = &config.ca_cert_pem {
        if !String::from_utf8_lossy(pem).contains(PEM_CERT_MARKER) {
            return Err(PlatformError::tls("CA file contains no PEM certificate"));
        }
        let cert = Certificate::from_pem(pem).map_err(|e| PlatformError::tls(e.to_string()))?;
        builder = builder.add_root_certificate(cert);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("cryptocli/"));
        assert!(config.ca_cert_pem.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::default()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(3))
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_build_client() {
        let result = build_http_client(&HttpConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_non_pem_ca() {
        let config = HttpConfig::default().with_ca_cert_pem(b"not a certificate".to_vec());
        let err = build_http_client(&config).unwrap_err();
        assert!(matches!(err, PlatformError::Tls(_)));
    }
}
