//! List applicants use case.

use std::sync::Arc;

use hireloop_domain::{ApiRequest, Application, JobId};

use super::{decode, ensure_success, require_session};
use crate::endpoints::Endpoints;
use crate::error::ApplicationResult;
use crate::ports::HttpClient;
use crate::session_client::SessionClient;

/// Use case listing the applications received by a job.
///
/// Organization-facing. The backend decides who may see the list; a refusal
/// comes back as `Rejected`.
pub struct ListApplicants<C: HttpClient> {
    client: Arc<SessionClient<C>>,
    endpoints: Endpoints,
}

impl<C: HttpClient> ListApplicants<C> {
    /// Creates a new `ListApplicants` use case.
    #[must_use]
    pub const fn new(client: Arc<SessionClient<C>>, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Lists the applicants of `job_id`.
    ///
    /// # Errors
    /// - `SessionExpired` when authentication could not be recovered
    /// - `Rejected` for any non-2xx answer
    /// - `InvalidResponse` when the payload is malformed
    pub async fn execute(&self, job_id: &JobId) -> ApplicationResult<Vec<Application>> {
        let request = ApiRequest::get(self.endpoints.applicants_path(job_id));
        let response = ensure_success(require_session(
            self.client.authenticated_fetch(&request).await?,
        )?)?;
        decode(&response)
    }
}
