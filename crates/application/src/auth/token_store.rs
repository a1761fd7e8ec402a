//! In-memory session storage.
//!
//! Process-local implementation of [`SessionStore`], used when nothing needs
//! to survive a restart and as the store in tests.

use std::sync::Arc;

use async_trait::async_trait;
use hireloop_domain::{Session, SessionUpdate, UserType};
use tokio::sync::{RwLock, watch};

use crate::ports::{SessionStore, SessionStoreError};

/// Thread-safe in-memory session store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    session: Arc<RwLock<Session>>,
    changes: Arc<watch::Sender<Session>>,
}

impl TokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(Session::empty())
    }

    /// Create a store holding `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        let (changes, _) = watch::channel(session.clone());
        Self {
            session: Arc::new(RwLock::new(session)),
            changes: Arc::new(changes),
        }
    }

    /// Get session status for display.
    pub async fn status(&self) -> SessionStatus {
        SessionStatus::of(&*self.session.read().await)
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for TokenStore {
    async fn read(&self) -> Session {
        self.session.read().await.clone()
    }

    async fn write(&self, update: SessionUpdate) -> Result<(), SessionStoreError> {
        let mut session = self.session.write().await;
        session.apply(update);
        // Published under the lock so observers see writes in order.
        self.changes.send_replace(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        let mut session = self.session.write().await;
        *session = Session::empty();
        self.changes.send_replace(Session::empty());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }
}

/// Summary of a session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No access token is stored.
    NotAuthenticated,
    /// An access token is stored.
    Authenticated {
        /// Cached email, if an identity is stored.
        email: Option<String>,
        /// Cached account kind, if an identity is stored.
        user_type: Option<UserType>,
        /// Whether a refresh token is stored.
        can_refresh: bool,
    },
}

impl SessionStatus {
    /// Summarises `session`.
    #[must_use]
    pub fn of(session: &Session) -> Self {
        if !session.is_authenticated() {
            return Self::NotAuthenticated;
        }
        let identity = session.identity();
        Self::Authenticated {
            email: identity.map(|i| i.email.clone()),
            user_type: identity.map(|i| i.user_type),
            can_refresh: session.can_refresh(),
        }
    }

    /// Returns true when an access token is stored.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not logged in".to_string(),
            Self::Authenticated {
                email,
                user_type,
                can_refresh,
            } => {
                let who = email.as_deref().unwrap_or("unknown account");
                let kind = user_type.map_or(String::new(), |t| format!(" ({t})"));
                let refresh_hint = if *can_refresh {
                    ""
                } else {
                    " (cannot refresh)"
                };
                format!("Logged in as {who}{kind}{refresh_hint}")
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use hireloop_domain::Identity;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_read_empty_store() {
        let store = TokenStore::new();
        assert!(store.read().await.is_empty());
        assert_eq!(store.status().await, SessionStatus::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_write_merges() {
        let store = TokenStore::new();
        store
            .write(SessionUpdate::login("a1", "r1", Some(Identity::candidate("c@x.io"))))
            .await
            .unwrap();
        store.write(SessionUpdate::access_token("a2")).await.unwrap();

        let session = store.read().await;
        assert_eq!(session.access_token(), Some("a2"));
        assert_eq!(session.refresh_token(), Some("r1"));
        assert_eq!(session.identity().unwrap().email, "c@x.io");
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = TokenStore::with_session(Session::established("a", "r", None));
        store.clear().await.unwrap();
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = TokenStore::new();
        let mut changes = store.subscribe();

        store.write(SessionUpdate::login("a", "r", None)).await.unwrap();
        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_authenticated());

        store.clear().await.unwrap();
        changes.changed().await.unwrap();
        assert!(changes.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writes_publish_final_state() {
        let store = TokenStore::new();
        let changes = store.subscribe();

        let writes = (0..16).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .write(SessionUpdate::access_token(format!("a{i}")))
                    .await
                    .unwrap();
            })
        });
        for write in writes.collect::<Vec<_>>() {
            write.await.unwrap();
        }

        assert_eq!(*changes.borrow(), store.read().await);
    }

    #[test]
    fn test_status_display_messages() {
        assert_eq!(SessionStatus::NotAuthenticated.display_message(), "Not logged in");
        let status = SessionStatus::Authenticated {
            email: Some("o@acme.io".to_string()),
            user_type: Some(UserType::Organization),
            can_refresh: true,
        };
        assert_eq!(status.display_message(), "Logged in as o@acme.io (organization)");
    }
}
