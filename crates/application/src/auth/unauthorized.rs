//! Forced logout on unrecoverable authentication failure.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::ports::SessionStore;

/// Why the session was ended without the user asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// A 401 arrived and the refresh failed.
    RefreshFailed,
    /// The retry after a successful refresh was answered with 401 again.
    RejectedAfterRefresh,
    /// The cached identity does not belong in the area being entered.
    UserTypeMismatch,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RefreshFailed => "session could not be refreshed",
            Self::RejectedAfterRefresh => "request rejected after refresh",
            Self::UserTypeMismatch => "account type does not match this area",
        })
    }
}

/// Reacts to an unrecoverable authentication failure.
#[async_trait]
pub trait UnauthorizedHandler: Send + Sync {
    /// Ends the session and sends the user to the login surface.
    async fn on_unauthorized(&self, reason: LogoutReason);
}

/// Clears the session and announces the logout.
///
/// Navigation is left to whoever watches [`ClearSession::subscribe`]; a view
/// layer redirects to its login surface when a reason is published.
pub struct ClearSession {
    store: Arc<dyn SessionStore>,
    logouts: watch::Sender<Option<LogoutReason>>,
}

impl ClearSession {
    /// Creates a handler clearing `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (logouts, _) = watch::channel(None);
        Self { store, logouts }
    }

    /// Observes forced logouts.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<LogoutReason>> {
        self.logouts.subscribe()
    }

    /// The most recent forced logout, if any.
    #[must_use]
    pub fn last_reason(&self) -> Option<LogoutReason> {
        *self.logouts.borrow()
    }
}

#[async_trait]
impl UnauthorizedHandler for ClearSession {
    async fn on_unauthorized(&self, reason: LogoutReason) {
        tracing::warn!(%reason, "forcing logout");
        if let Err(e) = self.store.clear().await {
            tracing::error!(error = %e, "failed to clear session during forced logout");
        }
        self.logouts.send_replace(Some(reason));
    }
}
