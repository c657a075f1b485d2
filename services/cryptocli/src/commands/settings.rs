//! Vault-wide tokenization settings.

use super::Call;
use crate::error::CliError;
use clap::Args;
use serde_json::{Map, Value};
use vault_client::{Route, VaultRequest};

/// Flags of `update-tokenization-settings`.
#[derive(Args, Debug, Clone)]
pub struct UpdateSettingsArgs {
    /// Availability of tokenization in degraded mode: enable or disable
    #[arg(short = 'd', long = "degraded-mode-availability")]
    pub degraded_mode_availability: Option<String>,

    /// OIDC authentication for tokenization: enable or disable
    #[arg(short = 'o', long = "oidc-enabled")]
    pub oidc_enabled: Option<String>,

    /// Revision of the settings being updated
    #[arg(short = 'R', long)]
    pub revision: i64,
}

impl UpdateSettingsArgs {
    /// POST to `UpdateTokenizationSettings/`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] when no setting is given or a
    /// value is neither `enable` nor `disable`.
    pub fn call(self) -> Result<Call, CliError> {
        if self.degraded_mode_availability.is_none() && self.oidc_enabled.is_none() {
            return Err(CliError::invalid_input(
                "Specify any one of Tokenization settings to update",
            ));
        }

        let mut body = Map::new();
        if let Some(value) = &self.degraded_mode_availability {
            body.insert(
                "degraded_mode_availability".into(),
                Value::Bool(toggle("-d, --degraded-mode-availability", value)?),
            );
        }
        if let Some(value) = &self.oidc_enabled {
            body.insert(
                "oidc_enabled".into(),
                Value::Bool(toggle("-o, --oidc-enabled", value)?),
            );
        }
        body.insert("revision".into(), Value::from(self.revision));

        Ok(Call::new(VaultRequest::post(
            Route::action(["UpdateTokenizationSettings"]),
            Value::Object(body),
        ))
        .with_denied_message("Tokenization Settings not found"))
    }
}

fn toggle(flag: &str, value: &str) -> Result<bool, CliError> {
    match value {
        "enable" => Ok(true),
        "disable" => Ok(false),
        other => Err(CliError::invalid_input(format!(
            "Invalid {flag} option {other}. Supported: enable (or) disable"
        ))),
    }
}
