//! File-backed session store.
//!
//! Keeps the session in `session.json` so a login survives restarts. The
//! file is replaced atomically on every write and removed on clear.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hireloop_application::ports::{FileSystem, FileSystemError, SessionStore, SessionStoreError};
use hireloop_domain::{Session, SessionUpdate};
use tokio::sync::{RwLock, watch};

use crate::serialization::{SerializationError, from_json_bytes, to_json_file_bytes};

/// Session store persisted to a single JSON file.
///
/// The in-memory copy is authoritative for reads, so `read` never touches
/// the disk and never fails.
pub struct FileSessionStore<F: FileSystem> {
    fs: F,
    path: PathBuf,
    session: RwLock<Session>,
    changes: watch::Sender<Session>,
}

impl<F: FileSystem> FileSessionStore<F> {
    /// Opens the store at `path`, loading any session already saved there.
    ///
    /// A missing file is an empty session. An unreadable or corrupt file is
    /// logged and treated the same way, so a broken file only costs a login.
    pub async fn open(fs: F, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = Self::load(&fs, &path).await;
        let (changes, _) = watch::channel(session.clone());
        Self {
            fs,
            path,
            session: RwLock::new(session),
            changes,
        }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(fs: &F, path: &Path) -> Session {
        match fs.read_file(path).await {
            Ok(bytes) => match from_json_bytes::<Session>(&bytes) {
                Ok(session) => {
                    tracing::debug!(path = %path.display(), "loaded saved session");
                    session
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                    Session::empty()
                }
            },
            Err(FileSystemError::NotFound(_)) => Session::empty(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read session file");
                Session::empty()
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn persist(&self, session: &Session) -> Result<(), SessionStoreError> {
        let bytes = to_json_file_bytes(session).map_err(serialization_error)?;
        let temp = self.temp_path();
        self.fs.write_file(&temp, &bytes).await.map_err(io_error)?;
        self.fs.rename(&temp, &self.path).await.map_err(io_error)?;
        Ok(())
    }
}

fn serialization_error(e: SerializationError) -> SessionStoreError {
    SessionStoreError::Serialization(e.to_string())
}

fn io_error(e: FileSystemError) -> SessionStoreError {
    match e {
        FileSystemError::Io(io) => SessionStoreError::Io(io),
        other => SessionStoreError::Io(std::io::Error::other(other.to_string())),
    }
}

#[async_trait]
impl<F: FileSystem> SessionStore for FileSessionStore<F> {
    async fn read(&self) -> Session {
        self.session.read().await.clone()
    }

    async fn write(&self, update: SessionUpdate) -> Result<(), SessionStoreError> {
        let mut session = self.session.write().await;
        let mut next = session.clone();
        next.apply(update);
        self.persist(&next).await?;
        *session = next.clone();
        self.changes.send_replace(next);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        let mut session = self.session.write().await;
        // The in-memory session is dropped even when the file cannot be.
        *session = Session::empty();
        self.changes.send_replace(Session::empty());
        match self.fs.remove_file(&self.path).await {
            Ok(()) | Err(FileSystemError::NotFound(_)) => Ok(()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove session file");
                Err(io_error(e))
            }
        }
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }
}
