//! Opaque identifiers issued by the backend.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a job posting.
///
/// The backend owns the format; the client only carries it around and
/// interpolates it into endpoint paths. Deserialization runs the same
/// validation as [`JobId::new`] and also accepts integer ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a job id, rejecting empty values and values that would
    /// break out of a path segment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` for blank ids or ids
    /// containing `/`, `?` or `#`.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '?', '#']) {
            return Err(DomainError::InvalidIdentifier(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JobIdVisitor)
    }
}

struct JobIdVisitor;

impl Visitor<'_> for JobIdVisitor {
    type Value = JobId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a job id string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JobId, E> {
        JobId::new(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JobId, E> {
        Ok(JobId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JobId, E> {
        Ok(JobId(v.to_string()))
    }
}
