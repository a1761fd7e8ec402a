//! Command line errors.

use hireloop_application::{ApplicationError, HttpClientError};
use hireloop_domain::UserType;
use hireloop_infrastructure::ConfigError;
use thiserror::Error;

/// Anything that ends a command unsuccessfully.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Http(#[from] HttpClientError),

    /// A use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The command belongs to the other kind of account.
    #[error("this command requires a logged-in {0} account")]
    AreaDenied(UserType),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be rendered.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Body returned by the backend, for rejected requests.
    #[must_use]
    pub fn backend_body(&self) -> Option<&str> {
        match self {
            Self::Application(ApplicationError::Rejected { body, .. }) if !body.is_empty() => {
                Some(body)
            }
            _ => None,
        }
    }
}
