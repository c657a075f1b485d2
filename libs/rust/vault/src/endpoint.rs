//! Endpoint construction for the vault REST API.
//!
//! All calls live under `https://{server}/token/{version}/`. A [`Route`]
//! names the action path below that base; [`Endpoints`] resolves it.

use crate::error::{VaultError, VaultResult};
use url::Url;

/// REST API version segment.
pub const API_VERSION: &str = "1.0";

/// Action path below the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    segments: Vec<String>,
    trailing_slash: bool,
    query: Vec<(String, String)>,
}

impl Route {
    /// Route ending with a slash, the common form (`.../key/{guid}/purge/`).
    pub fn action<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            trailing_slash: true,
            query: Vec::new(),
        }
    }

    /// Route without trailing slash (`.../GetMaskPolicies?name=x`).
    pub fn bare<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trailing_slash: false,
            ..Self::action(segments)
        }
    }

    /// Append a query pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query pair unless the value is empty.
    #[must_use]
    pub fn query_non_empty(self, key: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.query(key, value)
        }
    }

    /// Path segments, as given.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Query pairs in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Resolves routes against one vault server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Endpoints for `server` (`host` or `host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidServer`] when the address is empty,
    /// carries a scheme or path, or does not parse as a host.
    pub fn for_server(server: &str) -> VaultResult<Self> {
        let trimmed = server.trim();
        if trimmed.is_empty()
            || trimmed.contains("://")
            || trimmed.contains('/')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(VaultError::InvalidServer(server.to_string()));
        }

        let base = Url::parse(&format!("https://{trimmed}/token/{API_VERSION}/"))
            .map_err(|_| VaultError::InvalidServer(server.to_string()))?;
        if base.host_str().map_or(true, str::is_empty) {
            return Err(VaultError::InvalidServer(server.to_string()));
        }
        Ok(Self { base })
    }

    /// Endpoints rooted at an explicit base URL, e.g. a local mock server.
    ///
    /// A missing `/token/{version}/` suffix is appended.
    #[must_use]
    pub fn from_base_url(mut base: Url) -> Self {
        let suffix = format!("/token/{API_VERSION}/");
        if !base.path().ends_with(&suffix) {
            let path = format!("{}{}", base.path().trim_end_matches('/'), suffix);
            base.set_path(&path);
        }
        Self { base }
    }

    /// API base URL, always ending in `/token/{version}/`.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Full URL for `route`. Empty segments are skipped; a route without
    /// segments resolves to the base itself.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidInput`] for a `.` or `..` segment and
    /// [`VaultError::InvalidServer`] if the base cannot take path segments.
    pub fn resolve(&self, route: &Route) -> VaultResult<Url> {
        if let Some(dots) = route.segments.iter().find(|s| matches!(s.as_str(), "." | "..")) {
            return Err(VaultError::invalid_input(format!(
                "Invalid path parameter {dots:?}"
            )));
        }

        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| VaultError::InvalidServer(self.base.to_string()))?;
            segments.pop_if_empty();
            let mut pushed = 0usize;
            for segment in route.segments.iter().filter(|s| !s.is_empty()) {
                segments.push(segment);
                pushed += 1;
            }
            if route.trailing_slash || pushed == 0 {
                segments.push("");
            }
        }

        if !route.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &route.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
