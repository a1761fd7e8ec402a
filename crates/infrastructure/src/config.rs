//! Client configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional file
//! (TOML, JSON or YAML by extension), then `HIRELOOP__*` environment
//! variables. Nested keys use `__`, e.g. `HIRELOOP__ENDPOINTS__LOGIN`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use hireloop_application::{Endpoints, SecondUnauthorized};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HIRELOOP";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged values are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the backend API. Endpoint paths are resolved against it.
    pub api_base_url: Url,
    /// Where the session is persisted.
    pub session_file: PathBuf,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Transport timeout. None means no timeout.
    pub request_timeout_secs: Option<u64>,
    /// Policy for a 401 on the retry after a refresh.
    pub second_unauthorized: SecondUnauthorized,
    /// Endpoint paths.
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            session_file: default_session_file(),
            user_agent: format!("hireloop/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: None,
            second_unauthorized: SecondUnauthorized::default(),
            endpoints: Endpoints::default(),
        }
    }
}

/// `<data dir>/hireloop/session.json`, or `./session.json` when the
/// platform has no data directory.
#[must_use]
pub fn default_session_file() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("session.json"),
        |dir| dir.join("hireloop").join("session.json"),
    )
}

impl ClientConfig {
    /// Loads configuration from the optional file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is malformed.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, Self::environment())
    }

    /// Loads configuration with an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is malformed.
    pub fn load_with(file: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Self = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validated()
    }

    /// The `HIRELOOP__*` environment source.
    #[must_use]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.api_base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "api_base_url cannot be a base: {}",
                self.api_base_url
            )));
        }
        if !self.api_base_url.path().ends_with('/') {
            let path = format!("{}/", self.api_base_url.path());
            self.api_base_url.set_path(&path);
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Transport timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::load_with(None, env(&[])).unwrap();

        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.second_unauthorized, SecondUnauthorized::ForceLogout);
        assert_eq!(config.request_timeout(), None);
        assert!(config.session_file.ends_with("session.json"));
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hireloop.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://file.example/api\"\nrequest_timeout_secs = 5\n\n[endpoints]\nlogin = \"v2/login/\"\n",
        )
        .unwrap();

        let config = ClientConfig::load_with(
            Some(&path),
            env(&[
                ("HIRELOOP__API_BASE_URL", "https://env.example/api/v1"),
                ("HIRELOOP__SECOND_UNAUTHORIZED", "pass_through"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://env.example/api/v1/");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.second_unauthorized, SecondUnauthorized::PassThrough);
        assert_eq!(config.endpoints.login, "v2/login/");
        assert_eq!(config.endpoints.refresh, "auth/token/refresh/");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result =
            ClientConfig::load_with(None, env(&[("HIRELOOP__REQUEST_TIMEOUT_SECS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ClientConfig::load_with(Some(Path::new("/nonexistent/hireloop.toml")), env(&[]));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
