//! Apply to job use case.

use std::sync::Arc;

use hireloop_domain::{ApiRequest, ApplyOutcome, JobPosting, ensure_can_apply};
use serde::Serialize;

use super::require_session;
use crate::endpoints::Endpoints;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;
use crate::session_client::SessionClient;

/// Input for applying to a job.
#[derive(Debug, Clone)]
pub struct ApplyToJobInput {
    /// The posting as last loaded.
    pub job: JobPosting,
    /// The candidate's resume on file, if any.
    pub resume_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApplyRequest<'a> {
    resume_url: &'a str,
}

/// Use case submitting a candidate's application.
///
/// Applying is idempotent from the candidate's point of view: a second
/// submission answered with "already registered" resolves to
/// [`ApplyOutcome::AlreadyRegistered`], never to an error.
pub struct ApplyToJob<C: HttpClient> {
    client: Arc<SessionClient<C>>,
    endpoints: Endpoints,
}

impl<C: HttpClient> ApplyToJob<C> {
    /// Creates a new `ApplyToJob` use case.
    #[must_use]
    pub const fn new(client: Arc<SessionClient<C>>, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Applies to `input.job` with the resume on file.
    ///
    /// # Errors
    /// - `Domain(MissingResume)` before any request when no resume is on file
    /// - `Domain(ActionUnavailable)` when the job is not open
    /// - `SessionExpired` when authentication could not be recovered
    /// - `Rejected` for a non-2xx answer other than "already registered"
    pub async fn execute(&self, input: &ApplyToJobInput) -> ApplicationResult<ApplyOutcome> {
        ensure_can_apply(&input.job.status, input.resume_url.as_deref())?;
        let resume_url = input.resume_url.as_deref().unwrap_or_default();

        let request = ApiRequest::post(self.endpoints.apply_path(&input.job.job_id))
            .with_json(&ApplyRequest { resume_url })?;
        let response = require_session(self.client.authenticated_fetch(&request).await?)?;

        let outcome = ApplyOutcome::from_response(response.status, &response.body).map_err(
            |rejection| ApplicationError::Rejected {
                status: rejection.status,
                body: rejection.body,
            },
        )?;
        tracing::info!(job_id = %input.job.job_id, ?outcome, "applied to job");
        Ok(outcome)
    }
}
