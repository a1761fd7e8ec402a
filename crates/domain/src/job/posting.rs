//! Job posting as seen by the client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Actor, Application, JobAction, JobStatus};
use crate::error::{DomainError, DomainResult};
use crate::id::JobId;

/// An organization's published opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Backend id.
    pub job_id: JobId,
    /// Title shown in listings.
    #[serde(default)]
    pub title: String,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Last day applications are accepted.
    pub application_close_date: NaiveDate,
    /// Number of positions to fill.
    pub openings: u32,
    /// Applications received, on organization-facing payloads.
    #[serde(default)]
    pub applied_candidates: Vec<Application>,
    /// When the posting was closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    /// Checks the structural invariants of a posting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOpenings` when `openings` is zero.
    pub fn validate(&self) -> DomainResult<()> {
        if self.openings == 0 {
            return Err(DomainError::InvalidOpenings(self.openings));
        }
        Ok(())
    }

    /// Actions a view may offer to `actor` for this posting.
    #[must_use]
    pub fn actions_for(&self, actor: Actor) -> Vec<JobAction> {
        self.status.actions_for(actor)
    }

    /// Returns true while candidates may apply.
    #[must_use]
    pub fn is_accepting_applications(&self) -> bool {
        self.status.legal_actions().contains(&JobAction::Apply)
    }

    /// Adopts the backend's view of this posting.
    ///
    /// The server is authoritative, but a status that moved backwards or a
    /// different job id means the payload cannot be trusted, so it is
    /// rejected instead of silently rendered. Unknown statuses on either
    /// side are accepted as-is.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` when the ids differ
    /// - `InvalidTransition` when the status moved backwards
    /// - `InvalidOpenings` when the new payload is malformed
    pub fn reconcile(&self, server: Self) -> DomainResult<Self> {
        if server.job_id != self.job_id {
            return Err(DomainError::InvalidIdentifier(server.job_id.to_string()));
        }
        server.validate()?;

        let unchanged = server.status == self.status;
        let unknown = self.status.is_unknown() || server.status.is_unknown();
        if !unchanged && !unknown && !self.status.can_transition_to(&server.status) {
            return Err(DomainError::InvalidTransition {
                from: self.status.clone(),
                to: server.status,
            });
        }
        Ok(server)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn posting(status: JobStatus) -> JobPosting {
        JobPosting {
            job_id: JobId::new("7").unwrap(),
            title: "Backend Engineer".to_string(),
            status,
            application_close_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            openings: 2,
            applied_candidates: Vec::new(),
            closed_at: None,
        }
    }

    #[test]
    fn test_deserialize_posting() {
        let json = r#"{
            "job_id": "7",
            "status": "open",
            "application_close_date": "2026-01-31",
            "openings": 1
        }"#;
        let job: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, JobStatus::Open);
        assert!(job.is_accepting_applications());
        assert!(job.applied_candidates.is_empty());
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_zero_openings_invalid() {
        let mut job = posting(JobStatus::Open);
        job.openings = 0;
        assert_eq!(job.validate(), Err(DomainError::InvalidOpenings(0)));
    }

    #[test]
    fn test_reconcile_forward() {
        let current = posting(JobStatus::Ongoing);
        let mut server = posting(JobStatus::Closed);
        server.closed_at = Some(Utc::now());
        let merged = current.reconcile(server).unwrap();
        assert_eq!(merged.status, JobStatus::Closed);
        assert!(merged.actions_for(Actor::OrganizationOwner).is_empty());
    }

    #[test]
    fn test_reconcile_rejects_backwards() {
        let current = posting(JobStatus::Closed);
        let result = current.reconcile(posting(JobStatus::Open));
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
    }

    #[test]
    fn test_reconcile_rejects_other_job() {
        let current = posting(JobStatus::Open);
        let mut other = posting(JobStatus::Open);
        other.job_id = JobId::new("8").unwrap();
        assert!(current.reconcile(other).is_err());
    }
}
