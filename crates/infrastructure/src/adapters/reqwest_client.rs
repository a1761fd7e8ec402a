//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Request paths are resolved against the configured API base URL.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use hireloop_application::ports::{HttpClient, HttpClientError, HttpFuture};
use hireloop_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method, Url};

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Every status, including 4xx and 5xx, is returned as a response. Only
/// transport failures become errors.
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// No timeout is applied unless one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(
        base_url: Url,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, HttpClientError> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Creates a client around a preconfigured reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            timeout: None,
        }
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// The error message including its source chain.
    fn full_message(error: &reqwest::Error) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = Self::full_message(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(Self::full_message(error))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: &'a ApiRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let url = request
                .resolve_url(&self.base_url)
                .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
            let timeout_ms = self
                .timeout
                .map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));

            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url);
            for header in request.headers.iter() {
                builder = builder.header(&header.name, &header.value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let duration = start.elapsed();
            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Body(e.to_string()))?
                .to_vec();

            tracing::debug!(
                method = %request.method,
                path = %request.path,
                status,
                elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                "response received"
            );

            Ok(ApiResponse::new(status, headers, body, duration))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base: &str) -> ReqwestHttpClient {
        ReqwestHttpClient::new(Url::parse(base).unwrap(), "hireloop-test", None).unwrap()
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = client("https://api.hireloop.dev/api/v1/");
        assert_eq!(client.base_url().as_str(), "https://api.hireloop.dev/api/v1/");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let client = client("http://127.0.0.1:9/");
        let result = client.execute(&ApiRequest::get("jobs/1/")).await;

        assert!(matches!(
            result,
            Err(HttpClientError::ConnectionRefused { .. } | HttpClientError::ConnectionFailed(_))
        ));
    }
}
