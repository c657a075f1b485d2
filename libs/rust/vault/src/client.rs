//! Vault HTTP client.
//!
//! Sends prepared [`VaultRequest`]s with the session token in `X-TOKEN-AUTH`
//! and hands back the raw reply for classification.

use crate::{
    config::ClientConfig,
    endpoint::{Endpoints, Route},
    error::{VaultError, VaultResult},
    reply::VaultReply,
    request::{FormField, RequestBody, VaultRequest},
    session::Session,
};
use cryptocli_common::build_http_client;
use reqwest::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Method,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, Span};

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "X-TOKEN-AUTH";

/// Vault client bound to one server.
pub struct VaultClient {
    http: Client,
    endpoints: Endpoints,
    token: Option<SecretString>,
}

impl VaultClient {
    /// Client for the server and token recorded in `session`.
    ///
    /// # Errors
    ///
    /// Fails if the server address is invalid or the CA file is unusable.
    pub fn connect(config: &ClientConfig, session: &Session) -> VaultResult<Self> {
        let cacert = session.cacert().or(config.cacert.as_deref());
        let http = http_client(config, cacert)?;
        let token = SecretString::from(session.access_token().expose_secret().to_owned());
        Ok(Self::new(http, session.endpoints()?, Some(token)))
    }

    /// Client without a token, used for login.
    ///
    /// # Errors
    ///
    /// Fails if the server address is invalid or the CA file is unusable.
    pub fn anonymous(config: &ClientConfig, server: &str, cacert: Option<&Path>) -> VaultResult<Self> {
        let http = http_client(config, cacert.or(config.cacert.as_deref()))?;
        Ok(Self::new(http, Endpoints::for_server(server)?, None))
    }

    /// Client from parts.
    #[must_use]
    pub const fn new(http: Client, endpoints: Endpoints, token: Option<SecretString>) -> Self {
        Self {
            http,
            endpoints,
            token,
        }
    }

    /// Endpoints this client resolves against.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the request fails.
    pub async fn login(&self, username: &str, password: &SecretString) -> VaultResult<VaultReply> {
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        let reply = self.post(Route::action(["login"]), body).await?;
        info!(username, status = reply.status.as_u16(), "Login attempted");
        Ok(reply)
    }

    /// GET `route`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the request fails.
    pub async fn get(&self, route: Route) -> VaultResult<VaultReply> {
        self.send(&VaultRequest::get(route)).await
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the request fails.
    pub async fn post(&self, route: Route, body: Value) -> VaultResult<VaultReply> {
        self.send(&VaultRequest::post(route, body)).await
    }

    /// PATCH a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the request fails.
    pub async fn patch(&self, route: Route, body: Value) -> VaultResult<VaultReply> {
        self.send(&VaultRequest::patch(route, body)).await
    }

    /// DELETE `route`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the request fails.
    pub async fn delete(&self, route: Route) -> VaultResult<VaultReply> {
        self.send(&VaultRequest::delete(route)).await
    }

    /// POST a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidInput`] if an attached file cannot be
    /// read and [`VaultError::Transport`] if the request fails.
    pub async fn post_multipart(&self, route: Route, fields: Vec<FormField>) -> VaultResult<VaultReply> {
        self.send(&VaultRequest::multipart(route, fields)).await
    }

    /// Send a prepared request.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the request fails or the body
    /// cannot be read.
    #[instrument(skip_all, fields(method = %request.method, url = tracing::field::Empty))]
    pub async fn send(&self, request: &VaultRequest) -> VaultResult<VaultReply> {
        let url = self.endpoints.resolve(&request.route)?;
        Span::current().record("url", url.as_str());

        let builder = self.authorized(request.method.clone(), url);
        let builder = match &request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields).await?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "Vault replied");
        Ok(VaultReply::new(status, body))
    }

    /// GET `route` and save the body under `dir`.
    ///
    /// The file is named after the `Content-Disposition` filename, or
    /// `fallback_name` when the server sends none.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Status`] for a non-success reply and
    /// [`VaultError::Io`] if the file cannot be written.
    #[instrument(skip_all, fields(url = tracing::field::Empty))]
    pub async fn download(&self, route: &Route, dir: &Path, fallback_name: &str) -> VaultResult<PathBuf> {
        let url = self.endpoints.resolve(route)?;
        Span::current().record("url", url.as_str());

        let response = self.authorized(Method::GET, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| fallback_name.to_string());
        let bytes = response.bytes().await?;

        let path = dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Downloaded file");
        Ok(path)
    }

    fn authorized(&self, method: Method, url: url::Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.header(AUTH_HEADER, token.expose_secret()),
            None => builder,
        }
    }
}

fn http_client(config: &ClientConfig, cacert: Option<&Path>) -> VaultResult<Client> {
    let mut http = config.http_config();
    if let Some(path) = cacert {
        let pem = std::fs::read(path).map_err(|e| {
            VaultError::invalid_input(format!("cannot read CA file {}: {e}", path.display()))
        })?;
        http = http.with_ca_cert_pem(pem);
    }
    Ok(build_http_client(&http)?)
}

async fn build_form(fields: &[FormField]) -> VaultResult<Form> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name.clone(), value.clone()),
            FormField::File { name, path } => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    VaultError::invalid_input(format!("cannot read {}: {e}", path.display()))
                })?;
                let file_name = path
                    .file_name()
                    .map_or_else(|| name.clone(), |n| n.to_string_lossy().into_owned());
                form.part(name.clone(), Part::bytes(bytes).file_name(file_name))
            }
        };
    }
    Ok(form)
}

/// File name from a `Content-Disposition` value, reduced to its last path
/// component.
fn attachment_filename(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => Some(value.trim().trim_matches('"').to_string()),
            "filename*" => {
                let value = value.trim();
                Some(value.split_once("''").map_or(value, |(_, name)| name).to_string())
            }
            _ => None,
        }
    })?;

    Path::new(&raw)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
