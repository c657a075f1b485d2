//! Command tree and top-level run loop.

use crate::{
    commands::{self, auth, VaultCommand},
    error::CliError,
    output::Report,
};
use clap::{Parser, Subcommand};
use cryptocli_common::init_tracing;
use std::path::{Path, PathBuf};
use tracing::debug;
use vault_client::{ClientConfig, Session, VaultClient, VaultError};

/// Subcommands that run without a token file.
const SESSIONLESS_COMMANDS: [&str; 3] = ["login", "version", "help"];

/// Global flags taking a value.
const VALUED_GLOBALS: [&str; 2] = ["--config", "--token-file"];

/// Tokenization Vault CLI
#[derive(Parser, Debug)]
#[command(
    name = "cryptocli",
    version,
    about = "Tokenization Vault CLI",
    long_about = "Perform Tokenization Vault operations."
)]
pub struct Cli {
    /// Config file (default is cryptocli.cfg in your home directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File for saving and reusing the access token and server details. Login
    /// creates it, other commands read it. Defaults to
    /// cryptocli.data/crypto_token.txt in your home directory
    #[arg(long = "token-file", global = true, value_name = "FILE")]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log into the vault and save the access token
    Login(auth::LoginArgs),
    /// Log out and remove the saved access token
    Logout,
    /// Print the version
    Version,
    #[command(flatten)]
    Vault(VaultCommand),
}

impl Cli {
    /// Run the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the error to report; its [`CliError::exit_code`] is the
    /// process status.
    pub async fn run(self) -> Result<Report, CliError> {
        if matches!(self.command, Commands::Version) {
            return Ok(auth::version());
        }

        let config = ClientConfig::load(self.config.as_deref())?;
        init_tracing(&config.tracing_config());

        let token_file = config.token_file_path(self.token_file.as_deref())?;
        debug!(path = %token_file.display(), "Using token file");

        match self.command {
            Commands::Login(args) => args.run(&config, &token_file).await,
            Commands::Logout => {
                let client = connect(&config, &token_file)?;
                auth::logout(&client, &token_file).await
            }
            Commands::Version => Ok(auth::version()),
            Commands::Vault(command) => {
                let client = connect(&config, &token_file)?;
                let invocation = command.invocation()?;
                let download_dir = std::env::current_dir().map_err(VaultError::from)?;
                commands::execute(invocation, &client, &download_dir).await
            }
        }
    }
}

/// Client for the session stored in `token_file`.
///
/// # Errors
///
/// Returns [`CliError::Session`] when the token file is missing or unusable.
pub fn connect(config: &ClientConfig, token_file: &Path) -> Result<VaultClient, CliError> {
    let session = Session::load(token_file).map_err(|source| CliError::Session {
        path: token_file.to_path_buf(),
        source,
    })?;
    Ok(VaultClient::connect(config, &session)?)
}

/// Reject parameters written with a single dash, such as `-policyName`.
///
/// `args` is the full command line including the program name. Nothing is
/// checked for `login`, `version` and `help`.
///
/// # Errors
///
/// Returns [`CliError::SingleDashParameter`] for the first offending
/// argument.
pub fn check_parameter_prefixes<S: AsRef<str>>(args: &[S]) -> Result<(), CliError> {
    let mut rest = args.iter().skip(1).map(AsRef::as_ref);

    let subcommand = loop {
        match rest.next() {
            None => return Ok(()),
            Some(arg) if VALUED_GLOBALS.contains(&arg) => {
                rest.next();
            }
            Some(arg) if arg.starts_with('-') => {}
            Some(arg) => break arg,
        }
    };
    if SESSIONLESS_COMMANDS.contains(&subcommand) {
        return Ok(());
    }

    match rest.find(|arg| is_single_dash_name(arg)) {
        Some(arg) => Err(CliError::SingleDashParameter(arg.to_string())),
        None => Ok(()),
    }
}

fn is_single_dash_name(arg: &str) -> bool {
    arg.len() > 2 && arg.starts_with('-') && !arg.starts_with("--")
}
