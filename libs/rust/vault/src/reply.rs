//! Vault replies and their classification.

use crate::error::{VaultError, VaultResult};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::Value;

/// How a reply is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Request accepted
    Succeeded,
    /// Server reported an error
    Failed,
    /// Empty 404: resource absent or caller not permitted
    Denied,
}

/// Raw reply: status and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultReply {
    /// HTTP status
    pub status: StatusCode,
    /// Body as returned by the server
    pub body: String,
}

impl VaultReply {
    /// Create a reply.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Classify the reply.
    ///
    /// An empty 404 is a denial and an object body with an `"error"` member
    /// is a failure. Anything else succeeded, whatever the status.
    #[must_use]
    pub fn outcome(&self) -> ReplyOutcome {
        if self.is_denial() {
            ReplyOutcome::Denied
        } else if self.field("error").is_some() {
            ReplyOutcome::Failed
        } else {
            ReplyOutcome::Succeeded
        }
    }

    /// Empty body with status 404.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        self.status == StatusCode::NOT_FOUND && self.body.trim().is_empty()
    }

    /// Body parsed as JSON, if it is JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Top-level member of a JSON object body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match self.json()? {
            Value::Object(mut map) => map.remove(name),
            _ => None,
        }
    }

    /// `access_token` member of a login reply.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MissingAccessToken`] when it is absent, empty
    /// or not a string.
    pub fn access_token(&self) -> VaultResult<SecretString> {
        match self.field("access_token") {
            Some(Value::String(token)) if !token.trim().is_empty() => Ok(SecretString::from(token)),
            _ => Err(VaultError::MissingAccessToken),
        }
    }
}
