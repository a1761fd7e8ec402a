//! Domain error types

use thiserror::Error;

use crate::job::{Actor, JobAction, JobStatus};

/// Domain-level errors that can occur during validation or state transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The server sent a status literal this client does not know.
    #[error("unknown {kind} status: {value:?}")]
    UnknownStatus {
        /// Which status family was being parsed ("job" or "application").
        kind: &'static str,
        /// The raw value received.
        value: String,
    },

    /// A job status change that the lifecycle does not allow.
    #[error("job cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: JobStatus,
        /// Requested status.
        to: JobStatus,
    },

    /// The actor is not allowed to trigger this change.
    #[error("{actor} may not {action}")]
    ActorNotPermitted {
        /// Who attempted it.
        actor: Actor,
        /// What was attempted.
        action: JobAction,
    },

    /// Only the backend may move a job into this status.
    #[error("only the backend may move a job to {to}")]
    SystemOnly {
        /// Requested status.
        to: JobStatus,
    },

    /// The action is not offered in the job's current status.
    #[error("{action} is not available while the job is {status}")]
    ActionUnavailable {
        /// What was attempted.
        action: JobAction,
        /// Status at the time.
        status: JobStatus,
    },

    /// The candidate has no resume on file, so applying would be wasted.
    #[error("a resume must be uploaded before applying")]
    MissingResume,

    /// A posting must offer at least one opening.
    #[error("job must have at least one opening, got {0}")]
    InvalidOpenings(u32),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
