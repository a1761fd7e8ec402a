//! Access token refresh.
//!
//! Exchanges the stored refresh token for a new access token. Every failure
//! collapses to `None` and leaves the session untouched; the caller decides
//! what a failed refresh means.

use std::sync::Arc;

use async_trait::async_trait;
use hireloop_domain::{ApiRequest, SessionUpdate, token_preview};
use serde::{Deserialize, Serialize};

use crate::ports::{HttpClient, SessionStore};

/// Obtains a fresh access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Refreshes and persists the access token, returning it on success.
    ///
    /// Returns `None` on any failure, without mutating the session.
    async fn refresh(&self) -> Option<String>;
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Refreshes against the backend's refresh endpoint.
///
/// The refresh request goes straight to the HTTP client, never through the
/// session client, so a failing refresh cannot recurse.
pub struct HttpTokenRefresher<C: HttpClient> {
    http: Arc<C>,
    store: Arc<dyn SessionStore>,
    endpoint: String,
}

impl<C: HttpClient> HttpTokenRefresher<C> {
    /// Creates a refresher posting to `endpoint`.
    pub fn new(http: Arc<C>, store: Arc<dyn SessionStore>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            store,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> TokenRefresher for HttpTokenRefresher<C> {
    async fn refresh(&self) -> Option<String> {
        let session = self.store.read().await;
        let Some(refresh_token) = session.refresh_token() else {
            tracing::info!("no refresh token stored, cannot refresh");
            return None;
        };

        let request = match ApiRequest::post(self.endpoint.as_str())
            .with_json(&RefreshRequest { refresh_token })
        {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode refresh request");
                return None;
            }
        };

        let response = match self.http.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "refresh request failed");
                return None;
            }
        };

        if !response.is_success() {
            tracing::warn!(status = response.status, "refresh endpoint rejected the refresh token");
            return None;
        }

        let access_token = match response.json::<RefreshResponse>() {
            Ok(body) if !body.access_token.is_empty() => body.access_token,
            Ok(_) => {
                tracing::warn!("refresh response carried an empty access token");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed refresh response");
                return None;
            }
        };

        if let Err(e) = self
            .store
            .write(SessionUpdate::access_token(access_token.clone()))
            .await
        {
            tracing::warn!(error = %e, "failed to persist refreshed access token");
            return None;
        }

        tracing::info!(token = %token_preview(&access_token), "access token refreshed");
        Some(access_token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::ports::{HttpClientError, HttpFuture};
    use hireloop_domain::{ApiResponse, Session};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Mock HTTP client answering every request with the same result.
    struct MockHttpClient {
        response: Result<ApiResponse, HttpClientError>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl MockHttpClient {
        fn new(response: Result<ApiResponse, HttpClientError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute<'a>(&'a self, request: &'a ApiRequest) -> HttpFuture<'a> {
            self.requests.lock().unwrap().push(request.clone());
            let result = self.response.clone();
            Box::pin(async move { result })
        }
    }

    fn store_with(session: Session) -> Arc<TokenStore> {
        Arc::new(TokenStore::with_session(session))
    }

    #[tokio::test]
    async fn test_refresh_success_persists_only_access_token() {
        let http = MockHttpClient::new(Ok(ApiResponse::with_body(200, r#"{"access_token": "new"}"#)));
        let store = store_with(Session::established("old", "ref", None));
        let refresher = HttpTokenRefresher::new(http.clone(), store.clone(), "auth/token/refresh/");

        assert_eq!(refresher.refresh().await.as_deref(), Some("new"));

        let session = store.read().await;
        assert_eq!(session.access_token(), Some("new"));
        assert_eq!(session.refresh_token(), Some("ref"));

        let requests = http.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"refresh_token":"ref"}"#));
        assert!(!requests[0].is_authorized());
    }

    #[tokio::test]
    async fn test_missing_refresh_token_skips_request() {
        let http = MockHttpClient::new(Ok(ApiResponse::with_body(200, r#"{"access_token": "x"}"#)));
        let store = store_with(Session::empty());
        let refresher = HttpTokenRefresher::new(http.clone(), store, "refresh");

        assert!(refresher.refresh().await.is_none());
        assert!(http.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_leave_session_untouched() {
        let cases = vec![
            Ok(ApiResponse::with_body(400, r#"{"detail": "token invalid"}"#)),
            Ok(ApiResponse::with_body(200, "not json")),
            Ok(ApiResponse::with_body(200, r#"{"access_token": ""}"#)),
            Err(HttpClientError::ConnectionFailed("down".to_string())),
        ];
        for response in cases {
            let http = MockHttpClient::new(response);
            let store = store_with(Session::established("old", "ref", None));
            let refresher = HttpTokenRefresher::new(http, store.clone(), "refresh");

            assert!(refresher.refresh().await.is_none());
            assert_eq!(store.read().await.access_token(), Some("old"));
        }
    }
}
