//! Job posting lifecycle.
//!
//! ```text
//!   open ──(close date passes, backend)──→ ongoing ──(owner closes)──→ closed
//!     └──────────────────(owner closes)───────────────────────────────┘
//! ```
//!
//! Status only moves forward and `closed` is terminal. The client never
//! performs a transition itself: it asks the backend and then adopts
//! whatever state the backend reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Status of a job posting as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Accepting applications.
    Open,
    /// Application window has closed; interviews in progress.
    Ongoing,
    /// Closed by the organization. Terminal.
    Closed,
    /// A literal this client does not recognise. Offers no actions.
    Unknown(String),
}

impl JobStatus {
    /// Parses a wire literal, failing on anything unrecognised.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStatus` for unrecognised values.
    pub fn parse_strict(value: &str) -> DomainResult<Self> {
        match Self::from(value.to_string()) {
            Self::Unknown(value) => Err(DomainError::UnknownStatus { kind: "job", value }),
            status => Ok(status),
        }
    }

    /// Returns the wire literal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Ongoing => "ongoing",
            Self::Closed => "closed",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true for `closed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true for `Unknown`.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    const fn rank(&self) -> Option<u8> {
        match self {
            Self::Open => Some(0),
            Self::Ongoing => Some(1),
            Self::Closed => Some(2),
            Self::Unknown(_) => None,
        }
    }

    /// Whether `next` is a legal forward move from this status.
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }

    /// Validates a transition together with the actor causing it.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` when the move is not forward
    /// - `SystemOnly` when anyone but the backend tries to start review
    /// - `ActorNotPermitted` when anyone but an owner tries to close
    pub fn transition(&self, next: Self, actor: Actor) -> DomainResult<Self> {
        if !self.can_transition_to(&next) {
            return Err(DomainError::InvalidTransition {
                from: self.clone(),
                to: next,
            });
        }
        match next {
            Self::Ongoing if actor != Actor::System => Err(DomainError::SystemOnly { to: next }),
            Self::Closed if !JobAction::Close.permitted_for(actor) => {
                Err(DomainError::ActorNotPermitted {
                    actor,
                    action: JobAction::Close,
                })
            }
            _ => Ok(next),
        }
    }

    /// Actions a view may offer in this status, regardless of who is looking.
    #[must_use]
    pub const fn legal_actions(&self) -> &'static [JobAction] {
        match self {
            Self::Open => &[JobAction::Apply],
            Self::Ongoing => &[JobAction::Close],
            Self::Closed | Self::Unknown(_) => &[],
        }
    }

    /// Legal actions narrowed to those the actor may take.
    #[must_use]
    pub fn actions_for(&self, actor: Actor) -> Vec<JobAction> {
        self.legal_actions()
            .iter()
            .copied()
            .filter(|action| action.permitted_for(actor))
            .collect()
    }

    /// Checks that `actor` may take `action` right now.
    ///
    /// # Errors
    ///
    /// Returns `ActionUnavailable` when the status does not offer the action,
    /// or `ActorNotPermitted` when the actor may never take it.
    pub fn ensure_action(&self, action: JobAction, actor: Actor) -> DomainResult<()> {
        if !action.permitted_for(actor) {
            return Err(DomainError::ActorNotPermitted { actor, action });
        }
        if !self.legal_actions().contains(&action) {
            return Err(DomainError::ActionUnavailable {
                action,
                status: self.clone(),
            });
        }
        Ok(())
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Self::Open,
            "ongoing" => Self::Ongoing,
            "closed" => Self::Closed,
            _ => {
                tracing::warn!(status = %value, "unrecognised job status from backend");
                Self::Unknown(value)
            }
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who causes a lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// A candidate account.
    Candidate,
    /// Organization account with the owner role.
    OrganizationOwner,
    /// Organization account without the owner role.
    OrganizationMember,
    /// The backend itself (scheduled sweeps).
    System,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Candidate => "candidate",
            Self::OrganizationOwner => "organization owner",
            Self::OrganizationMember => "organization member",
            Self::System => "system",
        })
    }
}

/// User-triggerable actions on a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobAction {
    /// Submit an application.
    Apply,
    /// Close the posting.
    Close,
}

impl JobAction {
    /// Whether `actor` may ever take this action.
    #[must_use]
    pub const fn permitted_for(self, actor: Actor) -> bool {
        match self {
            Self::Apply => matches!(actor, Actor::Candidate),
            Self::Close => matches!(actor, Actor::OrganizationOwner),
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Apply => "apply",
            Self::Close => "close the job",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL: [JobStatus; 3] = [JobStatus::Open, JobStatus::Ongoing, JobStatus::Closed];

    #[test]
    fn test_only_forward_transitions_are_legal() {
        let mut legal = Vec::new();
        for from in &ALL {
            for to in &ALL {
                if from.can_transition_to(to) {
                    legal.push((from.as_str(), to.as_str()));
                }
            }
        }
        assert_eq!(
            legal,
            vec![("open", "ongoing"), ("open", "closed"), ("ongoing", "closed")]
        );
    }

    #[test]
    fn test_closed_offers_nothing() {
        assert!(JobStatus::Closed.legal_actions().is_empty());
        assert!(JobStatus::Closed.actions_for(Actor::OrganizationOwner).is_empty());
    }

    #[test]
    fn test_legal_actions_per_status() {
        assert_eq!(JobStatus::Open.legal_actions(), &[JobAction::Apply]);
        assert_eq!(JobStatus::Ongoing.legal_actions(), &[JobAction::Close]);
    }

    #[test]
    fn test_actions_filtered_by_actor() {
        assert_eq!(JobStatus::Open.actions_for(Actor::Candidate), vec![JobAction::Apply]);
        assert!(JobStatus::Open.actions_for(Actor::OrganizationOwner).is_empty());
        assert_eq!(
            JobStatus::Ongoing.actions_for(Actor::OrganizationOwner),
            vec![JobAction::Close]
        );
        assert!(JobStatus::Ongoing.actions_for(Actor::OrganizationMember).is_empty());
    }

    #[test]
    fn test_transition_actor_rules() {
        assert_eq!(
            JobStatus::Open.transition(JobStatus::Ongoing, Actor::System).unwrap(),
            JobStatus::Ongoing
        );
        assert!(matches!(
            JobStatus::Open.transition(JobStatus::Ongoing, Actor::OrganizationOwner),
            Err(DomainError::SystemOnly { .. })
        ));
        assert!(JobStatus::Open
            .transition(JobStatus::Closed, Actor::OrganizationOwner)
            .is_ok());
        assert!(matches!(
            JobStatus::Ongoing.transition(JobStatus::Closed, Actor::OrganizationMember),
            Err(DomainError::ActorNotPermitted { .. })
        ));
    }

    #[test]
    fn test_backward_and_repeat_transitions_rejected() {
        assert!(matches!(
            JobStatus::Closed.transition(JobStatus::Open, Actor::OrganizationOwner),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(matches!(
            JobStatus::Closed.transition(JobStatus::Closed, Actor::OrganizationOwner),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_unknown_status_is_inert() {
        let status: JobStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(status, JobStatus::Unknown("paused".to_string()));
        assert!(status.legal_actions().is_empty());
        assert!(!status.can_transition_to(&JobStatus::Closed));
        assert!(JobStatus::parse_strict("paused").is_err());
    }

    #[test]
    fn test_wire_literals() {
        let status: JobStatus = serde_json::from_str("\"Ongoing\"").unwrap();
        assert_eq!(status, JobStatus::Ongoing);
        assert_eq!(serde_json::to_string(&JobStatus::Closed).unwrap(), "\"closed\"");
    }

    #[test]
    fn test_ensure_action() {
        assert!(JobStatus::Open.ensure_action(JobAction::Apply, Actor::Candidate).is_ok());
        assert!(matches!(
            JobStatus::Ongoing.ensure_action(JobAction::Apply, Actor::Candidate),
            Err(DomainError::ActionUnavailable { .. })
        ));
        assert!(matches!(
            JobStatus::Ongoing.ensure_action(JobAction::Close, Actor::Candidate),
            Err(DomainError::ActorNotPermitted { .. })
        ));
    }
}
