//! Authenticated Fetch
//!
//! Wraps every outbound call with bearer-token injection and a single
//! refresh-and-retry on 401. The protocol is a small state machine:
//!
//! ```text
//!   Original ──401──→ Refresh ──token──→ Retry ──→ return response
//!      │                 │
//!      └─other─→ return  └─none─→ forced logout, return None
//! ```
//!
//! `Retry` has no transition back to `Refresh`, so one call site costs at
//! most one refresh and one extra request.

use std::sync::Arc;

use hireloop_domain::{ApiRequest, ApiResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{LogoutReason, TokenRefresher, UnauthorizedHandler};
use crate::ports::{HttpClient, HttpClientError, SessionStore};

/// Outcome of an authenticated fetch.
///
/// `Ok(None)` means authentication could not be recovered: the session has
/// been cleared and the caller must not proceed.
pub type FetchResult = Result<Option<ApiResponse>, HttpClientError>;

/// What to do when the retry after a successful refresh is answered with 401.
///
/// Such a 401 may mean the session was revoked, or that the endpoint
/// refuses this user for authorization reasons. The two cannot be told
/// apart from the status alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondUnauthorized {
    /// Treat it as a revoked session and log out.
    #[default]
    ForceLogout,
    /// Hand the 401 to the caller and keep the session.
    PassThrough,
}

#[derive(Debug)]
enum Attempt {
    Original,
    Refresh,
    Retry(String),
}

/// Client issuing requests on behalf of the current session.
pub struct SessionClient<C: HttpClient> {
    http: Arc<C>,
    store: Arc<dyn SessionStore>,
    refresher: Arc<dyn TokenRefresher>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
    second_unauthorized: SecondUnauthorized,
}

impl<C: HttpClient> SessionClient<C> {
    /// Creates a session client.
    pub fn new(
        http: Arc<C>,
        store: Arc<dyn SessionStore>,
        refresher: Arc<dyn TokenRefresher>,
        unauthorized: Arc<dyn UnauthorizedHandler>,
    ) -> Self {
        Self {
            http,
            store,
            refresher,
            unauthorized,
            second_unauthorized: SecondUnauthorized::default(),
        }
    }

    /// Sets the policy for a 401 on the retry.
    #[must_use]
    pub const fn with_second_unauthorized(mut self, policy: SecondUnauthorized) -> Self {
        self.second_unauthorized = policy;
        self
    }

    /// The session store this client reads tokens from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The underlying HTTP client, for calls that must bypass the session.
    #[must_use]
    pub const fn http(&self) -> &Arc<C> {
        &self.http
    }

    /// Issues `request` with the current access token.
    ///
    /// Any status other than 401 is returned unmodified after exactly one
    /// call. On 401 the token is refreshed once and the request re-issued
    /// once; the retry's response is returned whatever its status. If the
    /// refresh fails, the unauthorized handler runs and `Ok(None)` is
    /// returned without retrying.
    ///
    /// # Errors
    ///
    /// Transport failures of the original request or of the retry are
    /// returned as-is and never retried.
    pub async fn authenticated_fetch(&self, request: &ApiRequest) -> FetchResult {
        let mut attempt = Attempt::Original;
        loop {
            attempt = match attempt {
                Attempt::Original => {
                    let session = self.store.read().await;
                    let outgoing = match session.access_token() {
                        Some(token) => request.authorized(token),
                        None => request.clone(),
                    };
                    tracing::debug!(
                        method = %request.method,
                        path = %request.path,
                        authenticated = session.is_authenticated(),
                        "sending request"
                    );
                    let response = self.http.execute(&outgoing).await?;
                    if !response.is_unauthorized() {
                        return Ok(Some(response));
                    }
                    tracing::info!(path = %request.path, "received 401, refreshing access token");
                    Attempt::Refresh
                }
                Attempt::Refresh => match self.refresher.refresh().await {
                    Some(token) => Attempt::Retry(token),
                    None => {
                        self.unauthorized
                            .on_unauthorized(LogoutReason::RefreshFailed)
                            .await;
                        return Ok(None);
                    }
                },
                Attempt::Retry(token) => {
                    let response = self.http.execute(&request.authorized(&token)).await?;
                    if response.is_unauthorized()
                        && self.second_unauthorized == SecondUnauthorized::ForceLogout
                    {
                        self.unauthorized
                            .on_unauthorized(LogoutReason::RejectedAfterRefresh)
                            .await;
                    }
                    return Ok(Some(response));
                }
            };
        }
    }
}
