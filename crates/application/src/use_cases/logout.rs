//! Logout use case.

use std::sync::Arc;

use hireloop_domain::ApiRequest;
use serde::Serialize;

use crate::error::ApplicationResult;
use crate::ports::{HttpClient, SessionStore};

#[derive(Debug, Serialize)]
struct LogoutRequest<'a> {
    refresh_token: &'a str,
}

/// Use case ending the session.
///
/// Revocation on the backend is best effort. The local session is cleared
/// whether or not the backend call succeeds, or happens at all.
pub struct Logout<C: HttpClient> {
    http: Arc<C>,
    store: Arc<dyn SessionStore>,
    endpoint: String,
}

impl<C: HttpClient> Logout<C> {
    /// Creates a new `Logout` use case.
    pub fn new(http: Arc<C>, store: Arc<dyn SessionStore>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            store,
            endpoint: endpoint.into(),
        }
    }

    /// Revokes the refresh token if one is stored, then clears the session.
    ///
    /// # Errors
    /// Returns `Storage` only when the local session cannot be cleared.
    pub async fn execute(&self) -> ApplicationResult<()> {
        let session = self.store.read().await;

        if let Some(refresh_token) = session.refresh_token() {
            self.revoke(refresh_token, session.access_token()).await;
        } else {
            tracing::debug!("no refresh token stored, skipping revocation");
        }

        self.store.clear().await?;
        tracing::info!("logged out");
        Ok(())
    }

    async fn revoke(&self, refresh_token: &str, access_token: Option<&str>) {
        let request = match ApiRequest::post(self.endpoint.as_str())
            .with_json(&LogoutRequest { refresh_token })
        {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode logout request");
                return;
            }
        };
        let request = match access_token {
            Some(token) => request.authorized(token),
            None => request,
        };

        match self.http.execute(&request).await {
            Ok(response) if response.is_success() => tracing::debug!("refresh token revoked"),
            Ok(response) => {
                tracing::warn!(status = response.status, "backend refused logout, ignoring");
            }
            Err(e) => tracing::warn!(error = %e, "logout request failed, ignoring"),
        }
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

    #[tokio::test]
    async fn test_logout_without_refresh_token_clears_without_request() {
        let http = MockHttpClient::new(Ok(ApiResponse::with_body(200, "")));
        let mut session = Session::empty();
        session.apply(hireloop_domain::SessionUpdate::access_token("only-access"));
        let store = Arc::new(TokenStore::with_session(session));

        Logout::new(http.clone(), store.clone(), "auth/logout/")
            .execute()
            .await
            .unwrap();

        assert!(store.read().await.is_empty());
        assert!(http.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_revokes_then_clears() {
        let http = MockHttpClient::new(Ok(ApiResponse::with_body(205, "")));
        let store = Arc::new(TokenStore::with_session(Session::established("a", "r", None)));

        Logout::new(http.clone(), store.clone(), "auth/logout/")
            .execute()
            .await
            .unwrap();

        let requests = http.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"refresh_token":"r"}"#));
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_logout_ignores_backend_failure() {
        let http = MockHttpClient::new(Err(HttpClientError::ConnectionRefused {
            host: "api.local".to_string(),
            port: 443,
        }));
        let store = Arc::new(TokenStore::with_session(Session::established("a", "r", None)));

        Logout::new(http, store.clone(), "auth/logout/")
            .execute()
            .await
            .unwrap();

        assert!(store.read().await.is_empty());
    }
}
