//! Vault subcommands.
//!
//! Each argument struct turns its flags into an [`Invocation`] without any
//! I/O; [`execute`] performs it.

pub mod auth;
pub mod crypto;
pub mod keys;
pub mod policies;
pub mod settings;
pub mod tokenize;

use crate::{error::CliError, output::Report};
use clap::Subcommand;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, instrument};
use vault_client::{ReplyOutcome, Route, VaultClient, VaultRequest};

/// Message printed for an empty 404 reply.
pub const ACTION_DENIED: &str = "Action denied";

/// A request plus how its reply is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Request to send
    pub request: VaultRequest,
    /// Printed when the vault answers with an empty 404
    pub denied_message: &'static str,
    /// Printed after a successful reply
    pub success_note: Option<String>,
    /// Whether an `"error"` member in the reply fails the command
    pub reports_errors: bool,
}

impl Call {
    /// Call with the default denial message and no note.
    #[must_use]
    pub const fn new(request: VaultRequest) -> Self {
        Self {
            request,
            denied_message: ACTION_DENIED,
            success_note: None,
            reports_errors: true,
        }
    }

    /// Print `note` after a successful reply.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.success_note = Some(note.into());
        self
    }

    /// Print the reply even when it carries an `"error"` member.
    #[must_use]
    pub const fn ignoring_errors(mut self) -> Self {
        self.reports_errors = false;
        self
    }

    /// Replace the denial message.
    #[must_use]
    pub const fn with_denied_message(mut self, message: &'static str) -> Self {
        self.denied_message = message;
        self
    }
}

/// What a vault subcommand asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Send a request and print the reply
    Call(Call),
    /// Save a file served by the vault
    Download {
        /// What to fetch
        route: Route,
        /// File name used when the vault sends none
        fallback_name: String,
    },
}

impl From<Call> for Invocation {
    fn from(call: Call) -> Self {
        Self::Call(call)
    }
}

/// Subcommands that run against a logged-in vault.
#[derive(Subcommand, Debug, Clone)]
pub enum VaultCommand {
    /// Tokenize
    Tokenize(tokenize::TokenArgs),
    /// Detokenize
    Detokenize(tokenize::TokenArgs),
    /// Mask data
    Mask(tokenize::MaskArgs),
    /// Detokenize and mask
    DetokenMask(tokenize::DetokenMaskArgs),
    /// Tokenize a batch of values
    BatchTokenize(tokenize::BatchArgs),
    /// Detokenize a batch of tokens
    BatchDetokenize(tokenize::BatchArgs),
    /// Mask a batch of values
    BatchMask(tokenize::BatchMaskArgs),

    /// Encrypt
    Encrypt(crypto::CipherArgs),
    /// Decrypt
    Decrypt(crypto::CipherArgs),
    /// Sign
    Sign(crypto::SignArgs),
    /// Wrap
    Wrap(crypto::SignArgs),

    /// Create Key
    CreateKey(keys::CreateKeyArgs),
    /// Generate a key and its certificate signing request
    GenerateKeyCsr(keys::GenerateKeyCsrArgs),
    /// List keys of a keyset
    ListOfKeys(keys::ListKeysArgs),
    /// Set key properties
    SetKeyProperty(keys::SetKeyPropertyArgs),
    /// Enable or disable a key
    UpdateKeyState(keys::UpdateKeyStateArgs),
    /// Schedule or cancel key destruction
    ScheduleDeleteKey(keys::ScheduleDeleteKeyArgs),
    /// Purge a key
    PurgeKey(keys::KeyGuidArgs),
    /// Export Key
    ExportKey(keys::ExportKeyArgs),
    /// Export public key of asymmetric key
    ExportPublicKey(keys::ExportPublicKeyArgs),
    /// Enable HSM protection for a keyset
    #[command(name = "enable-hsm-for-keyset")]
    EnableHsmForKeyset(keys::EnableHsmArgs),

    /// Create Access Policy
    CreateAccessPolicy(policies::CreateAccessPolicyArgs),
    /// Create Mask Policy
    CreateMaskPolicy(policies::CreateMaskPolicyArgs),
    /// Create Tokenization Policy
    CreateTokenizationPolicy(policies::CreateTokenizationPolicyArgs),
    /// Get Tokenization Policy
    GetTokenizationPolicy(policies::PolicyNameArgs),
    /// Get Mask Policy
    GetMaskPolicy(policies::PolicyNameArgs),
    /// Get list of Mask Policies
    ListMaskPolicies(policies::ListPoliciesArgs),
    /// Get list of Tokenization Policies
    ListTokenizationPolicies(policies::ListPoliciesArgs),

    /// Update Tokenization Settings
    UpdateTokenizationSettings(settings::UpdateSettingsArgs),
}

impl VaultCommand {
    /// Build the invocation for this command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] when flag values are inconsistent.
    pub fn invocation(self) -> Result<Invocation, CliError> {
        let call = match self {
            Self::Tokenize(args) => args.call("token"),
            Self::Detokenize(args) => args.call("detoken"),
            Self::Mask(args) => args.call(),
            Self::DetokenMask(args) => args.call(),
            Self::BatchTokenize(args) => args.call("token")?,
            Self::BatchDetokenize(args) => args.call("detoken")?,
            Self::BatchMask(args) => args.call()?,

            Self::Encrypt(args) => args.call("encrypt"),
            Self::Decrypt(args) => args.call("decrypt"),
            Self::Sign(args) => args.call("sign"),
            Self::Wrap(args) => args.call("wrap"),

            Self::CreateKey(args) => args.call(),
            Self::GenerateKeyCsr(args) => args.call(),
            Self::ListOfKeys(args) => args.call(),
            Self::SetKeyProperty(args) => args.call(),
            Self::UpdateKeyState(args) => args.call(),
            Self::ScheduleDeleteKey(args) => args.call(),
            Self::PurgeKey(args) => args.purge_call(),
            Self::ExportKey(args) => args.call(),
            Self::ExportPublicKey(args) => return Ok(args.invocation()),
            Self::EnableHsmForKeyset(args) => args.call(),

            Self::CreateAccessPolicy(args) => args.call()?,
            Self::CreateMaskPolicy(args) => args.call(),
            Self::CreateTokenizationPolicy(args) => args.call(),
            Self::GetTokenizationPolicy(args) => args.call("GetTokenPolicy"),
            Self::GetMaskPolicy(args) => args.call("GetMaskPolicy"),
            Self::ListMaskPolicies(args) => args.call("GetMaskPolicies"),
            Self::ListTokenizationPolicies(args) => args.call("GetTokenPolicies"),

            Self::UpdateTokenizationSettings(args) => args.call()?,
        };
        Ok(call.into())
    }
}

/// Perform `invocation` and classify the outcome.
///
/// Downloads are written to `download_dir`.
///
/// # Errors
///
/// Returns [`CliError::Server`] or [`CliError::Denied`] for unsuccessful
/// replies and [`CliError::Transport`] when no reply was received.
#[instrument(skip_all)]
pub async fn execute(
    invocation: Invocation,
    client: &VaultClient,
    download_dir: &Path,
) -> Result<Report, CliError> {
    match invocation {
        Invocation::Call(call) => {
            let reply = client.send(&call.request).await?;
            match reply.outcome() {
                ReplyOutcome::Denied => Err(CliError::Denied(call.denied_message.to_string())),
                ReplyOutcome::Failed if call.reports_errors => Err(CliError::Server(reply.body)),
                ReplyOutcome::Failed | ReplyOutcome::Succeeded => {
                    Ok(Report::reply(reply.body, call.success_note))
                }
            }
        }
        Invocation::Download {
            route,
            fallback_name,
        } => {
            let path = client.download(&route, download_dir, &fallback_name).await?;
            let name = path
                .file_name()
                .map_or_else(|| fallback_name.clone(), |n| n.to_string_lossy().into_owned());
            info!(file = %name, "Public key saved");
            Ok(Report::message(format!(
                "Successfully downloaded public key as - {name}"
            )))
        }
    }
}

/// Insert `value` under `key` when present.
pub(crate) fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::String(value));
    }
}

/// Fail with the batch message unless all lengths are equal.
pub(crate) fn ensure_paired(lengths: &[usize]) -> Result<(), CliError> {
    if lengths.windows(2).all(|w| w[0] == w[1]) {
        Ok(())
    } else {
        Err(CliError::invalid_input(
            "Missing parameters. Please check and try again",
        ))
    }
}
