//! Client for the tokenization vault REST API.
//!
//! Builds endpoint URLs, persists the login session in a token file, sends
//! authenticated JSON, multipart and download requests, and classifies the
//! replies into success, server error or denial.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod reply;
pub mod request;
pub mod session;

pub use client::VaultClient;
pub use self::config::{ClientConfig, ConfigError};
pub use endpoint::{Endpoints, Route, API_VERSION};
pub use error::{VaultError, VaultResult};
pub use reply::{ReplyOutcome, VaultReply};
pub use request::{FormField, RequestBody, VaultRequest};
pub use session::Session;
