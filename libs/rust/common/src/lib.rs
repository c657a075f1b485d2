//! Shared library for cross-cutting concerns in the cryptocli workspace.
//!
//! This crate provides centralized implementations for:
//! - Error type with exit-code classification
//! - HTTP client configuration and building (rustls, optional private CA)
//! - Tracing subscriber setup that keeps stdout free for command output

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod tracing_config;

pub use error::PlatformError;
pub use http::{build_http_client, HttpConfig};
pub use tracing_config::{init_tracing, TracingConfig};
