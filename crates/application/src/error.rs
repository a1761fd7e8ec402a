//! Application error types

use hireloop_domain::DomainError;
use thiserror::Error;

use crate::ports::{HttpClientError, SessionStoreError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain precondition or invariant failed.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The request could not be transported.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// The session could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] SessionStoreError),

    /// Authentication could not be recovered; the session has been cleared.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The operation needs a logged-in identity and there is none.
    #[error("not logged in")]
    NotAuthenticated,

    /// The backend answered with a non-success status. The body is passed
    /// through untouched for the caller to render.
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The backend answered 2xx with a body this client cannot read.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
