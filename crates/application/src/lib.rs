//! Hireloop Application - Session protocol, use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP transport, session persistence, file system)
//! - The authenticated fetch with single refresh-and-retry
//! - Use case orchestration for the job and application flows
//! - Application-level error handling

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod ports;
pub mod session_client;
pub mod use_cases;

pub use auth::{
    ClearSession, HttpTokenRefresher, LogoutReason, SessionStatus, TokenRefresher, TokenStore,
    UnauthorizedHandler,
};
pub use endpoints::Endpoints;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    FileSystem, FileSystemError, HttpClient, HttpClientError, HttpFuture, SessionStore,
    SessionStoreError,
};
pub use session_client::{FetchResult, SecondUnauthorized, SessionClient};
pub use use_cases::{
    ApplyToJob, ApplyToJobInput, AreaAccess, CloseJob, EnterArea, FetchJob, ListApplicants,
    ListApplications, Login, LoginInput, Logout,
};
