//! Authentication module for the Hireloop client.
//!
//! This module provides:
//! - In-memory session storage with change notification
//! - Access token refresh against the backend
//! - Forced logout when authentication cannot be recovered

mod refresher;
mod token_store;
mod unauthorized;

pub use refresher::{HttpTokenRefresher, TokenRefresher};
pub use token_store::{SessionStatus, TokenStore};
pub use unauthorized::{ClearSession, LogoutReason, UnauthorizedHandler};
