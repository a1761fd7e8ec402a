//! Backend endpoint paths.

use hireloop_domain::JobId;
use serde::{Deserialize, Serialize};

const JOB_ID: &str = "{job_id}";

/// Paths of the backend endpoints used by the client, relative to the API
/// base URL. Job-scoped paths contain a `{job_id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Credential login.
    pub login: String,
    /// Access token refresh.
    pub refresh: String,
    /// Refresh token revocation.
    pub logout: String,
    /// Job detail.
    pub job: String,
    /// Candidate applies to a job.
    pub apply: String,
    /// Owner closes a job.
    pub close: String,
    /// Applicants of a job.
    pub applicants: String,
    /// The candidate's own applications.
    pub my_applications: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "auth/login/".to_string(),
            refresh: "auth/token/refresh/".to_string(),
            logout: "auth/logout/".to_string(),
            job: "jobs/{job_id}/".to_string(),
            apply: "jobs/{job_id}/apply/".to_string(),
            close: "jobs/{job_id}/close/".to_string(),
            applicants: "jobs/{job_id}/applicants/".to_string(),
            my_applications: "applications/".to_string(),
        }
    }
}

impl Endpoints {
    /// Path of a job's detail resource.
    #[must_use]
    pub fn job_path(&self, job_id: &JobId) -> String {
        self.job.replace(JOB_ID, job_id.as_str())
    }

    /// Path of a job's apply action.
    #[must_use]
    pub fn apply_path(&self, job_id: &JobId) -> String {
        self.apply.replace(JOB_ID, job_id.as_str())
    }

    /// Path of a job's close action.
    #[must_use]
    pub fn close_path(&self, job_id: &JobId) -> String {
        self.close.replace(JOB_ID, job_id.as_str())
    }

    /// Path of a job's applicant listing.
    #[must_use]
    pub fn applicants_path(&self, job_id: &JobId) -> String {
        self.applicants.replace(JOB_ID, job_id.as_str())
    }
}
