//! List own applications use case.

use std::sync::Arc;

use hireloop_domain::{ApiRequest, Application};

use super::{decode, ensure_success, require_session};
use crate::error::ApplicationResult;
use crate::ports::HttpClient;
use crate::session_client::SessionClient;

/// Use case listing the logged-in candidate's applications.
pub struct ListApplications<C: HttpClient> {
    client: Arc<SessionClient<C>>,
    endpoint: String,
}

impl<C: HttpClient> ListApplications<C> {
    /// Creates a new `ListApplications` use case.
    pub fn new(client: Arc<SessionClient<C>>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Lists the candidate's applications with their current status.
    ///
    /// # Errors
    /// - `SessionExpired` when authentication could not be recovered
    /// - `Rejected` for any non-2xx answer
    /// - `InvalidResponse` when the payload is malformed
    pub async fn execute(&self) -> ApplicationResult<Vec<Application>> {
        let request = ApiRequest::get(self.endpoint.as_str());
        let response = ensure_success(require_session(
            self.client.authenticated_fetch(&request).await?,
        )?)?;
        let applications: Vec<Application> = decode(&response)?;
        tracing::debug!(count = applications.len(), "loaded applications");
        Ok(applications)
    }
}
