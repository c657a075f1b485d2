//! Shared test utilities for the cryptocli workspace.
//!
//! This crate provides:
//! - Proptest generators for command inputs
//! - A wiremock-backed vault with a matching client
//! - Reply fixtures and token file helpers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::MockVault;
