//! Close job use case.

use std::sync::Arc;

use hireloop_domain::{ApiRequest, JobAction, JobPosting};

use super::{decode, ensure_success, require_session};
use crate::endpoints::Endpoints;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;
use crate::session_client::SessionClient;

/// Use case closing a job posting on behalf of its organization owner.
///
/// The local status is never flipped optimistically. The result is the
/// backend's posting, reconciled against the one the caller held.
pub struct CloseJob<C: HttpClient> {
    client: Arc<SessionClient<C>>,
    endpoints: Endpoints,
}

impl<C: HttpClient> CloseJob<C> {
    /// Creates a new `CloseJob` use case.
    #[must_use]
    pub const fn new(client: Arc<SessionClient<C>>, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Closes `job`, returning the posting as the backend now has it.
    ///
    /// When the close answer carries no posting, the job is fetched again.
    ///
    /// # Errors
    /// - `NotAuthenticated` when no identity is cached
    /// - `Domain` when closing is not offered to this actor in this status,
    ///   or the backend's posting moved backwards
    /// - `SessionExpired` when authentication could not be recovered
    /// - `Rejected` for any non-2xx answer
    pub async fn execute(&self, job: &JobPosting) -> ApplicationResult<JobPosting> {
        let session = self.client.store().read().await;
        let actor = session
            .identity()
            .map(hireloop_domain::Identity::actor)
            .ok_or(ApplicationError::NotAuthenticated)?;
        job.status.ensure_action(JobAction::Close, actor)?;

        let request = ApiRequest::post(self.endpoints.close_path(&job.job_id));
        let response = ensure_success(require_session(
            self.client.authenticated_fetch(&request).await?,
        )?)?;

        let server = if let Ok(posting) = decode::<JobPosting>(&response) {
            posting
        } else {
            tracing::debug!(job_id = %job.job_id, "close answer carried no posting, refetching");
            let request = ApiRequest::get(self.endpoints.job_path(&job.job_id));
            let response = ensure_success(require_session(
                self.client.authenticated_fetch(&request).await?,
            )?)?;
            decode(&response)?
        };

        let closed = job.reconcile(server)?;
        tracing::info!(job_id = %closed.job_id, status = %closed.status, "job closed");
        Ok(closed)
    }
}
