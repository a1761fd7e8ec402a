//! Outbound API request type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Headers, HttpMethod};
use crate::auth::bearer;
use crate::error::{DomainError, DomainResult};

/// Name of the header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// A request against the recruitment API.
///
/// `path` is resolved against the configured base URL unless it is already
/// absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path or absolute URL
    pub path: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// JSON body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ApiRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Attaches a JSON body and the matching content type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if `value` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        let body =
            serde_json::to_string(value).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        self.headers.set("Content-Type", "application/json");
        self.body = Some(body);
        Ok(self)
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Returns a copy carrying `token` as its bearer credential.
    #[must_use]
    pub fn authorized(&self, token: &str) -> Self {
        self.clone().with_header(AUTHORIZATION, bearer(token))
    }

    /// Returns true if an `Authorization` header is present.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.headers.contains(AUTHORIZATION)
    }

    /// Resolves the target URL against `base`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` when the result is not a valid URL.
    pub fn resolve_url(&self, base: &Url) -> DomainResult<Url> {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            return Url::parse(&self.path)
                .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.path)));
        }
        base.join(self.path.trim_start_matches('/'))
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.path)))
    }
}
