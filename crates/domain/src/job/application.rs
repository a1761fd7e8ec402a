//! Candidate applications and their observed lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Actor, JobAction, JobStatus};
use crate::error::{DomainError, DomainResult};
use crate::id::JobId;

/// Server message fragment meaning "this candidate already applied".
const ALREADY_REGISTERED: &str = "already registered";

/// Status of a candidate's application.
///
/// Only `applied` is ever requested by the client. Every other status is
/// authored by the backend as interview rounds complete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    /// Submitted, not yet reviewed.
    Applied,
    /// Being screened.
    InReview,
    /// At least one interview round is scheduled.
    InterviewScheduled,
    /// An offer has been made.
    OfferExtended,
    /// The candidate accepted the offer. Terminal.
    OfferAccepted,
    /// Not progressing. Terminal.
    Rejected,
    /// A literal this client does not recognise.
    Unknown(String),
}

impl ApplicationStatus {
    /// Parses a wire literal, failing on anything unrecognised.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStatus` for unrecognised values.
    pub fn parse_strict(value: &str) -> DomainResult<Self> {
        match Self::from(value.to_string()) {
            Self::Unknown(value) => Err(DomainError::UnknownStatus {
                kind: "application",
                value,
            }),
            status => Ok(status),
        }
    }

    /// Returns the wire literal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Applied => "applied",
            Self::InReview => "in_review",
            Self::InterviewScheduled => "interview_scheduled",
            Self::OfferExtended => "offer_extended",
            Self::OfferAccepted => "offer_accepted",
            Self::Rejected => "rejected",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true for `offer_accepted` and `rejected`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::OfferAccepted | Self::Rejected)
    }

    const fn rank(&self) -> Option<u8> {
        match self {
            Self::Applied => Some(0),
            Self::InReview => Some(1),
            Self::InterviewScheduled => Some(2),
            Self::OfferExtended => Some(3),
            Self::OfferAccepted => Some(4),
            Self::Rejected | Self::Unknown(_) => None,
        }
    }

    /// Whether the backend moving this application to `next` is forward
    /// progress. Repeated `interview_scheduled` covers successive rounds.
    #[must_use]
    pub fn can_progress_to(&self, next: &Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if matches!(next, Self::Rejected) {
            return !matches!(self, Self::Unknown(_));
        }
        match (self, next) {
            (Self::InterviewScheduled, Self::InterviewScheduled) => true,
            _ => match (self.rank(), next.rank()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "applied" => Self::Applied,
            "in_review" => Self::InReview,
            "interview_scheduled" => Self::InterviewScheduled,
            "offer_extended" => Self::OfferExtended,
            "offer_accepted" => Self::OfferAccepted,
            "rejected" => Self::Rejected,
            _ => {
                tracing::warn!(status = %value, "unrecognised application status from backend");
                Self::Unknown(value)
            }
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One interview round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Round label, e.g. "Technical interview".
    pub name: String,
    /// When the round takes place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Outcome text once the round is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// A candidate's application against one job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Backend id of the application, when exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    /// Parent posting, when the listing is not already scoped to one job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    /// Candidate email, on organization-facing listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_email: Option<String>,
    /// Current status.
    pub status: ApplicationStatus,
    /// Completed rounds.
    #[serde(default)]
    pub previous_rounds: Vec<Round>,
    /// Rounds in progress.
    #[serde(default)]
    pub ongoing_rounds: Vec<Round>,
    /// Resume submitted with the application.
    pub resume_url: String,
    /// Offer letter location once an offer exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_letter_path: Option<String>,
}

impl Application {
    /// The round currently in progress, if any.
    #[must_use]
    pub fn current_round(&self) -> Option<&Round> {
        self.ongoing_rounds.first()
    }

    /// Returns true once the backend has attached an offer letter.
    #[must_use]
    pub const fn has_offer_letter(&self) -> bool {
        self.offer_letter_path.is_some()
    }
}

/// Checks the client-side preconditions for applying.
///
/// The resume check runs first so no request is issued without one.
///
/// # Errors
///
/// - `MissingResume` when no resume is on file
/// - whatever `JobStatus::ensure_action` reports for the job's status
pub fn ensure_can_apply(job_status: &JobStatus, resume_url: Option<&str>) -> DomainResult<()> {
    if resume_url.is_none_or(|url| url.trim().is_empty()) {
        return Err(DomainError::MissingResume);
    }
    job_status.ensure_action(JobAction::Apply, Actor::Candidate)
}

/// Result of an apply request, as the candidate should see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The application was created by this call.
    Applied,
    /// The backend already had an application from this candidate.
    AlreadyRegistered,
}

impl ApplyOutcome {
    /// Both outcomes mean the candidate has applied.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied | Self::AlreadyRegistered)
    }

    /// Classifies the backend's answer to an apply request.
    ///
    /// An "already registered" answer is success, whatever its status code.
    ///
    /// # Errors
    ///
    /// Returns `ApplyRejection` for any other non-2xx answer.
    pub fn from_response(status: u16, body: &str) -> Result<Self, ApplyRejection> {
        if body.to_ascii_lowercase().contains(ALREADY_REGISTERED) {
            return Ok(Self::AlreadyRegistered);
        }
        if (200..300).contains(&status) {
            return Ok(Self::Applied);
        }
        Err(ApplyRejection {
            status,
            body: body.to_string(),
        })
    }
}

/// A non-2xx apply answer that is not "already registered".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application rejected with status {status}")]
pub struct ApplyRejection {
    /// HTTP status returned by the backend.
    pub status: u16,
    /// Raw response body, for the view to render.
    pub body: String,
}
