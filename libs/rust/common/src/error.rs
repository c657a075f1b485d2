//! Centralized error type for the workspace libraries.
//!
//! Errors are classified as transport failures (the request never produced a
//! usable reply) or local failures (unusable TLS material). The CLI maps that
//! split onto its exit codes.

use thiserror::Error;

/// Common error type for platform operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP client could not be built or a request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// TLS material could not be loaded
    #[error("TLS configuration error: {0}")]
    Tls(String),
}

impl PlatformError {
    /// Check if this error happened on the wire rather than locally.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptocli_common::PlatformError;
    ///
    /// let err = PlatformError::tls("no certificate");
    /// assert!(!err.is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Create a TLS error with the given message.
    #[must_use]
    pub fn tls(msg: impl Into<String>) -> Self {
        Self::Tls(msg.into())
    }
}
