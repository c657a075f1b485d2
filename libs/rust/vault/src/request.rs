//! Prepared request descriptions.
//!
//! Commands build a [`VaultRequest`] without touching the network; the
//! client sends it.

use crate::endpoint::Route;
use reqwest::Method;
use serde_json::Value;
use std::path::PathBuf;

/// One multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Plain text value
    Text {
        /// Field name
        name: String,
        /// Field value
        value: String,
    },
    /// Contents of a local file, sent with its file name
    File {
        /// Field name
        name: String,
        /// File to attach
        path: PathBuf,
    },
}

impl FormField {
    /// Text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// File field.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// `application/json` body
    Json(Value),
    /// `multipart/form-data` body
    Multipart(Vec<FormField>),
}

/// Method, route and body of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultRequest {
    /// HTTP method
    pub method: Method,
    /// Action path
    pub route: Route,
    /// Payload
    pub body: RequestBody,
}

impl VaultRequest {
    /// GET without body.
    #[must_use]
    pub const fn get(route: Route) -> Self {
        Self {
            method: Method::GET,
            route,
            body: RequestBody::Empty,
        }
    }

    /// GET carrying a JSON body.
    #[must_use]
    pub const fn get_with_body(route: Route, body: Value) -> Self {
        Self {
            method: Method::GET,
            route,
            body: RequestBody::Json(body),
        }
    }

    /// POST with a JSON body.
    #[must_use]
    pub const fn post(route: Route, body: Value) -> Self {
        Self {
            method: Method::POST,
            route,
            body: RequestBody::Json(body),
        }
    }

    /// PATCH with a JSON body.
    #[must_use]
    pub const fn patch(route: Route, body: Value) -> Self {
        Self {
            method: Method::PATCH,
            route,
            body: RequestBody::Json(body),
        }
    }

    /// DELETE without body.
    #[must_use]
    pub const fn delete(route: Route) -> Self {
        Self {
            method: Method::DELETE,
            route,
            body: RequestBody::Empty,
        }
    }

    /// POST with a multipart form.
    #[must_use]
    pub const fn multipart(route: Route, fields: Vec<FormField>) -> Self {
        Self {
            method: Method::POST,
            route,
            body: RequestBody::Multipart(fields),
        }
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}
