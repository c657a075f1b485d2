//! Login, logout and version.

use crate::{error::CliError, output::Report};
use clap::Args;
use secrecy::SecretString;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;
use vault_client::{ClientConfig, ReplyOutcome, Route, Session, VaultClient, VaultReply};

use super::ACTION_DENIED;

/// Environment variable read when `--password` is absent.
pub const PASSWORD_ENV: &str = "CRYPTOCLI_PASSWORD";

/// Flags of `login`.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Vault server, as host or host:port
    #[arg(short = 's', long)]
    pub server: String,

    /// User name
    #[arg(short = 'u', long)]
    pub username: String,

    /// Password
    #[arg(short = 'p', long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,

    /// CA certificate (PEM) used to verify the vault
    #[arg(short = 'c', long)]
    pub cacert: Option<PathBuf>,
}

impl LoginArgs {
    /// Log in and write the token file.
    ///
    /// # Errors
    ///
    /// Fails when the server rejects the credentials, cannot be reached, or
    /// the token file cannot be written.
    pub async fn run(self, config: &ClientConfig, token_file: &Path) -> Result<Report, CliError> {
        let client = VaultClient::anonymous(config, &self.server, self.cacert.as_deref())?;
        self.run_with(&client, token_file).await
    }

    /// Log in through `client` and write the token file.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn run_with(self, client: &VaultClient, token_file: &Path) -> Result<Report, CliError> {
        let Self {
            server,
            username,
            password,
            cacert,
        } = self;
        let reply = client.login(&username, &SecretString::from(password)).await?;
        save_login(&reply, server, cacert, token_file)
    }
}

/// Persist the session from a login reply.
///
/// # Errors
///
/// Fails when the reply is not a successful login or the token file cannot
/// be written.
pub fn save_login(
    reply: &VaultReply,
    server: String,
    cacert: Option<PathBuf>,
    token_file: &Path,
) -> Result<Report, CliError> {
    check(reply)?;
    let session = Session::new(server, reply.access_token()?, cacert);
    session.save(token_file)?;
    info!(path = %token_file.display(), "Token file written");
    Ok(Report::message(format!(
        "Login successful. Token saved in {}",
        token_file.display()
    )))
}

/// Invalidate the session on the vault and delete the token file.
///
/// # Errors
///
/// Fails when the vault rejects the request or cannot be reached; the token
/// file is kept in that case.
pub async fn logout(client: &VaultClient, token_file: &Path) -> Result<Report, CliError> {
    let reply = client.post(Route::action(["logout"]), json!({})).await?;
    check(&reply)?;
    Session::remove(token_file)?;
    info!(path = %token_file.display(), "Token file removed");
    Ok(Report::message("Logged out"))
}

/// `cryptocli <version>`
#[must_use]
pub fn version() -> Report {
    Report::message(concat!("cryptocli ", env!("CARGO_PKG_VERSION")))
}

fn check(reply: &VaultReply) -> Result<(), CliError> {
    match reply.outcome() {
        ReplyOutcome::Succeeded => Ok(()),
        ReplyOutcome::Failed => Err(CliError::Server(reply.body.clone())),
        ReplyOutcome::Denied => Err(CliError::Denied(ACTION_DENIED.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use secrecy::ExposeSecret;
    use test_utils::{
        fixtures::{error_reply, login_reply, TokenFileFixture},
        MockVault,
    };

    fn login_args() -> LoginArgs {
        LoginArgs {
            server: "vault.local:8443".into(),
            username: "admin".into(),
            password: "s3cret".into(),
            cacert: Some(PathBuf::from("/etc/vault/ca.pem")),
        }
    }

    fn save(reply: &VaultReply, token_file: &Path) -> Result<Report, CliError> {
        save_login(
            reply,
            "vault.local:8443".into(),
            Some(PathBuf::from("/etc/vault/ca.pem")),
            token_file,
        )
    }

    #[test]
    fn test_save_login_writes_token_file() {
        let fixture = TokenFileFixture::empty();
        let reply = VaultReply::new(StatusCode::OK, login_reply("fresh-token"));

        let report = save(&reply, fixture.path()).unwrap();
        assert!(report.body().starts_with("Login successful"));

        let session = Session::load(fixture.path()).unwrap();
        assert_eq!(session.server(), "vault.local:8443");
        assert_eq!(session.access_token().expose_secret(), "fresh-token");
        assert_eq!(session.cacert(), Some(Path::new("/etc/vault/ca.pem")));
    }

    #[test]
    fn test_save_login_rejects_failed_login() {
        let fixture = TokenFileFixture::empty();
        let reply = VaultReply::new(StatusCode::UNAUTHORIZED, error_reply("bad credentials"));

        let err = save(&reply, fixture.path()).unwrap_err();
        assert_eq!(err.code(), 3);
        assert!(!fixture.path().exists());
    }

    #[test]
    fn test_save_login_requires_access_token() {
        let fixture = TokenFileFixture::empty();
        let reply = VaultReply::new(StatusCode::OK, "{}");

        let err = save(&reply, fixture.path()).unwrap_err();
        assert!(matches!(err, CliError::Server(_)));
        assert!(!fixture.path().exists());
    }

    #[tokio::test]
    async fn test_login_against_vault_saves_session() {
        let vault = MockVault::start().await;
        vault.mount_post("login/", &login_reply("issued-token")).await;
        let fixture = TokenFileFixture::empty();

        let report = login_args()
            .run_with(&vault.client_with_token(None), fixture.path())
            .await
            .unwrap();
        assert!(report.body().ends_with(&fixture.path().display().to_string()));

        let requests = vault.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("X-TOKEN-AUTH").is_none());
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, json!({"username": "admin", "password": "s3cret"}));

        let session = Session::load(fixture.path()).unwrap();
        assert_eq!(session.server(), "vault.local:8443");
        assert_eq!(session.access_token().expose_secret(), "issued-token");
    }

    #[tokio::test]
    async fn test_login_rejected_by_vault() {
        let vault = MockVault::start().await;
        vault
            .mount("POST", "login/", 401, &error_reply("invalid credentials"))
            .await;
        let fixture = TokenFileFixture::empty();

        let err = login_args()
            .run_with(&vault.client_with_token(None), fixture.path())
            .await
            .unwrap_err();
        assert_eq!(err.code(), 3);
        assert!(!fixture.path().exists());
    }

    #[test]
    fn test_login_unreachable_vault_keeps_no_token_file() {
        let fixture = TokenFileFixture::empty();
        let args = LoginArgs {
            server: "127.0.0.1:1".into(),
            cacert: None,
            ..login_args()
        };

        let err = tokio_test::block_on(args.run(&ClientConfig::default(), fixture.path()))
            .unwrap_err();
        assert_eq!(err.code(), 4);
        assert!(!fixture.path().exists());
    }

    #[test]
    fn test_version() {
        assert_eq!(
            version().body(),
            format!("cryptocli {}", env!("CARGO_PKG_VERSION"))
        );
    }
}
