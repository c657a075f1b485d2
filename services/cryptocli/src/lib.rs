//! Command-line client for the tokenization vault.
//!
//! Every subcommand turns its flags into a [`commands::Invocation`], which
//! [`commands::execute`] sends through a [`vault_client::VaultClient`] and
//! turns into a [`output::Report`] or a [`error::CliError`] carrying the
//! process exit code.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{check_parameter_prefixes, Cli};
pub use error::CliError;
pub use output::Report;
