//! Area guard.
//!
//! Candidate and organization surfaces live side by side. Entering one with
//! the other kind of cached identity ends the session, so a stale login
//! never leaks into the wrong area.

use std::sync::Arc;

use hireloop_domain::UserType;

use crate::auth::{LogoutReason, UnauthorizedHandler};
use crate::ports::SessionStore;

/// Result of the area guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaAccess {
    /// The cached identity belongs in the area.
    Granted,
    /// Not logged in, or logged in as the wrong kind of account.
    Denied,
}

impl AreaAccess {
    /// Returns true for `Granted`.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Use case gating entry to a user-type-specific area.
pub struct EnterArea {
    store: Arc<dyn SessionStore>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl EnterArea {
    /// Creates a new `EnterArea` use case.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, unauthorized: Arc<dyn UnauthorizedHandler>) -> Self {
        Self {
            store,
            unauthorized,
        }
    }

    /// Checks the cached identity against `required`.
    ///
    /// A session whose identity is of another kind is cleared through the
    /// unauthorized handler. A session with no identity is left alone.
    pub async fn execute(&self, required: UserType) -> AreaAccess {
        let session = self.store.read().await;
        if !session.is_authenticated() {
            return AreaAccess::Denied;
        }
        if session.admits(required) {
            return AreaAccess::Granted;
        }
        if session.identity().is_some() {
            tracing::info!(area = %required, "cached identity does not match area");
            self.unauthorized
                .on_unauthorized(LogoutReason::UserTypeMismatch)
                .await;
        }
        AreaAccess::Denied
    }
}
