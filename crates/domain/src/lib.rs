//! Hireloop Domain - Core business types
//!
//! This crate defines the domain model for the Hireloop recruitment client:
//! the session held by the client, the job posting and application
//! lifecycles, and the request/response values exchanged with the backend.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod id;
pub mod job;
pub mod request;
pub mod response;

pub use auth::{Identity, OrgRole, Session, SessionUpdate, UserType, token_preview};
pub use error::{DomainError, DomainResult};
pub use id::JobId;
pub use job::{
    Actor, Application, ApplicationStatus, ApplyOutcome, ApplyRejection, JobAction, JobPosting,
    JobStatus, Round, ensure_can_apply,
};
pub use request::{ApiRequest, HttpMethod};
pub use response::{ApiResponse, StatusCode};
