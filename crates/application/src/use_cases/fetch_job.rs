//! Fetch job use case.

use std::sync::Arc;

use hireloop_domain::{ApiRequest, JobId, JobPosting};

use super::{decode, ensure_success, require_session};
use crate::endpoints::Endpoints;
use crate::error::ApplicationResult;
use crate::ports::HttpClient;
use crate::session_client::SessionClient;

/// Use case loading one job posting.
pub struct FetchJob<C: HttpClient> {
    client: Arc<SessionClient<C>>,
    endpoints: Endpoints,
}

impl<C: HttpClient> FetchJob<C> {
    /// Creates a new `FetchJob` use case.
    #[must_use]
    pub const fn new(client: Arc<SessionClient<C>>, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Loads the posting and checks its invariants.
    ///
    /// # Errors
    /// - `SessionExpired` when authentication could not be recovered
    /// - `Rejected` for any non-2xx answer
    /// - `InvalidResponse` or `Domain` when the payload is malformed
    pub async fn execute(&self, job_id: &JobId) -> ApplicationResult<JobPosting> {
        let request = ApiRequest::get(self.endpoints.job_path(job_id));
        let response = ensure_success(require_session(
            self.client.authenticated_fetch(&request).await?,
        )?)?;
        let job: JobPosting = decode(&response)?;
        job.validate()?;
        Ok(job)
    }
}
