//! Login use case.

use std::fmt;
use std::sync::Arc;

use hireloop_domain::{ApiRequest, Identity, SessionUpdate, token_preview};
use serde::{Deserialize, Serialize};

use super::{decode, ensure_success};
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, SessionStore};

/// Credentials for logging in.
#[derive(Clone, Serialize)]
pub struct LoginInput {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    user: Option<Identity>,
}

/// Use case exchanging credentials for a session.
///
/// Goes straight to the HTTP client: a 401 here means bad credentials, not
/// an expired token.
pub struct Login<C: HttpClient> {
    http: Arc<C>,
    store: Arc<dyn SessionStore>,
    endpoint: String,
}

impl<C: HttpClient> Login<C> {
    /// Creates a new `Login` use case.
    pub fn new(http: Arc<C>, store: Arc<dyn SessionStore>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            store,
            endpoint: endpoint.into(),
        }
    }

    /// Logs in and persists the whole session.
    ///
    /// # Errors
    /// - `Rejected` when the backend refuses the credentials
    /// - `InvalidResponse` when the answer lacks the token pair
    /// - `Storage` when the session cannot be persisted
    pub async fn execute(&self, input: &LoginInput) -> ApplicationResult<Option<Identity>> {
        let request = ApiRequest::post(self.endpoint.as_str()).with_json(input)?;
        let response = ensure_success(self.http.execute(&request).await?)?;
        let body: LoginResponse = decode(&response)?;

        // A login replaces whatever was there, including a stale identity.
        self.store.clear().await?;
        self.store
            .write(SessionUpdate::login(
                body.access_token.clone(),
                body.refresh_token,
                body.user.clone(),
            ))
            .await?;

        tracing::info!(
            email = %input.email,
            token = %token_preview(&body.access_token),
            "logged in"
        );
        Ok(body.user)
    }
}
