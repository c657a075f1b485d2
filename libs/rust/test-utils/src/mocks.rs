//! Wiremock-backed vault for tests.
//!
//! [`MockVault`] serves the `/token/1.0/` API on a local port and hands out
//! [`VaultClient`]s already pointed at it.

use secrecy::SecretString;
use url::Url;
use vault_client::{Endpoints, VaultClient, API_VERSION};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Token the mock clients authenticate with.
pub const MOCK_TOKEN: &str = "mock-access-token";

/// Local vault double.
pub struct MockVault {
    server: MockServer,
}

impl MockVault {
    /// Start on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Underlying server, for custom mocks.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// `host:port` of the server.
    #[must_use]
    pub fn address(&self) -> String {
        self.server.address().to_string()
    }

    /// Full request path for an API action, e.g. `api_path("token/")`.
    #[must_use]
    pub fn api_path(action: &str) -> String {
        format!("/token/{API_VERSION}/{action}")
    }

    /// Client holding [`MOCK_TOKEN`].
    ///
    /// # Panics
    ///
    /// Panics if the server URI does not parse.
    #[must_use]
    pub fn client(&self) -> VaultClient {
        self.client_with_token(Some(MOCK_TOKEN))
    }

    /// Client with the given token, or none.
    ///
    /// # Panics
    ///
    /// Panics if the server URI does not parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client_with_token(&self, token: Option<&str>) -> VaultClient {
        let base = Url::parse(&self.server.uri()).expect("mock server uri");
        VaultClient::new(
            reqwest::Client::new(),
            Endpoints::from_base_url(base),
            token.map(|t| SecretString::from(t.to_string())),
        )
    }

    /// Answer `verb` on `action` with `status` and `body`.
    pub async fn mount(&self, verb: &str, action: &str, status: u16, body: &str) {
        Mock::given(method(verb))
            .and(path(Self::api_path(action)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer POST on `action` with 200 and `body`.
    pub async fn mount_post(&self, action: &str, body: &str) {
        self.mount("POST", action, 200, body).await;
    }

    /// Answer `verb` on `action` with an empty 404.
    pub async fn mount_denied(&self, verb: &str, action: &str) {
        Mock::given(method(verb))
            .and(path(Self::api_path(action)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if request recording is disabled.
    #[allow(clippy::expect_used)]
    pub async fn requests(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .expect("request recording enabled")
    }

    /// JSON body of the only request received.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one JSON request was received.
    #[allow(clippy::expect_used)]
    pub async fn single_json_body(&self) -> serde_json::Value {
        let requests = self.requests().await;
        assert_eq!(requests.len(), 1, "expected exactly one request");
        serde_json::from_slice(&requests[0].body).expect("json request body")
    }
}
