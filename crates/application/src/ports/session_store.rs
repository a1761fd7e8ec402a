//! Session store port
//!
//! The single source of truth for the current [`Session`]. It is injected
//! wherever it is needed rather than reached through global state.

use async_trait::async_trait;
use hireloop_domain::{Session, SessionUpdate};
use tokio::sync::watch;

/// Errors that can occur while persisting the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage for the client-held session.
///
/// Every read is a fresh snapshot and every write replaces and persists the
/// whole session, so callers never observe a partial update.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current session. Never fails: missing or unreadable data
    /// reads as an empty session.
    async fn read(&self) -> Session;

    /// Merges `update` into the stored session and persists it.
    ///
    /// # Errors
    /// Returns an error if the session cannot be persisted.
    async fn write(&self, update: SessionUpdate) -> Result<(), SessionStoreError>;

    /// Removes the access token, refresh token and identity together.
    ///
    /// # Errors
    /// Returns an error if the persisted session cannot be removed.
    async fn clear(&self) -> Result<(), SessionStoreError>;

    /// Observes session changes made through this store.
    ///
    /// Every successful `write` or `clear` publishes the new snapshot.
    fn subscribe(&self) -> watch::Receiver<Session>;
}
