//! Reply bodies and token files for tests.

use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vault_client::Session;

/// Successful login reply carrying `token`.
#[must_use]
pub fn login_reply(token: &str) -> String {
    serde_json::json!({ "access_token": token }).to_string()
}

/// Tokenize reply.
#[must_use]
pub fn tokenize_reply(token_data: &str) -> String {
    serde_json::json!({ "tokenData": token_data }).to_string()
}

/// Reply reporting a server side error.
#[must_use]
pub fn error_reply(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Batch reply with one entry per value.
#[must_use]
pub fn batch_reply(values: &[&str]) -> String {
    serde_json::Value::Array(
        values
            .iter()
            .map(|v| serde_json::json!({ "tokenData": v }))
            .collect(),
    )
    .to_string()
}

/// Temporary directory holding a token file.
pub struct TokenFileFixture {
    dir: TempDir,
    path: PathBuf,
}

impl TokenFileFixture {
    /// Empty directory; [`Self::path`] does not exist yet.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("crypto_token.txt");
        Self { dir, path }
    }

    /// Token file for `server` holding `token`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_session(server: &str, token: &str) -> Self {
        let fixture = Self::empty();
        Session::new(server, SecretString::from(token.to_string()), None)
            .save(&fixture.path)
            .expect("write token file");
        fixture
    }

    /// Token file with arbitrary contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_contents(contents: &str) -> Self {
        let fixture = Self::empty();
        std::fs::write(&fixture.path, contents).expect("write token file");
        fixture
    }

    /// Token file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the token file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
