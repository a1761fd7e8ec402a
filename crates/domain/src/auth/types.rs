//! Session and identity types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::job::Actor;

/// Kind of account the cached identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// A candidate account.
    User,
    /// An organization account.
    Organization,
}

impl UserType {
    /// Returns the wire literal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of an organization account inside its organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    /// May manage postings, including closing them.
    Owner,
    /// May view postings and applicants.
    Member,
}

/// Cached principal information.
///
/// Used only for client-side gating. The backend stays authoritative for
/// every authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account email.
    pub email: String,
    /// Account kind.
    pub user_type: UserType,
    /// Role within the organization, for organization accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<OrgRole>,
    /// Whether the account belongs to an organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_org_member: Option<bool>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    /// Creates a candidate identity.
    #[must_use]
    pub fn candidate(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_type: UserType::User,
            role: None,
            is_org_member: None,
            name: None,
        }
    }

    /// Creates an organization identity with the given role.
    #[must_use]
    pub fn organization(email: impl Into<String>, role: OrgRole) -> Self {
        Self {
            email: email.into(),
            user_type: UserType::Organization,
            role: Some(role),
            is_org_member: Some(true),
            name: None,
        }
    }

    /// Maps the identity onto the lifecycle actor it acts as.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        match (self.user_type, self.role) {
            (UserType::User, _) => Actor::Candidate,
            (UserType::Organization, Some(OrgRole::Owner)) => Actor::OrganizationOwner,
            (UserType::Organization, _) => Actor::OrganizationMember,
        }
    }
}

/// The client-held session: token pair plus cached identity.
///
/// Both tokens are established together at login. A refresh replaces only
/// the access token, and logout drops everything at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, rename = "user", skip_serializing_if = "Option::is_none")]
    identity: Option<Identity>,
}

impl Session {
    /// An unauthenticated session.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            identity: None,
        }
    }

    /// A freshly logged-in session.
    #[must_use]
    pub fn established(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        identity: Option<Identity>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            identity,
        }
    }

    /// Current access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Current refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Cached identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Absence of an access token means logged out.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether a refresh can be attempted.
    #[must_use]
    pub const fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Whether nothing at all is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.identity.is_none()
    }

    /// `Authorization` header value for the current access token.
    #[must_use]
    pub fn bearer_header(&self) -> Option<String> {
        self.access_token.as_deref().map(bearer)
    }

    /// Whether the cached identity is of the required account kind.
    #[must_use]
    pub fn admits(&self, required: UserType) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.user_type == required)
    }

    /// Merges an update into this session. Only present fields are replaced.
    pub fn apply(&mut self, update: SessionUpdate) {
        if let Some(token) = update.access_token {
            self.access_token = Some(token);
        }
        if let Some(token) = update.refresh_token {
            self.refresh_token = Some(token);
        }
        if let Some(identity) = update.identity {
            self.identity = Some(identity);
        }
    }
}

/// A partial session write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    /// New access token.
    pub access_token: Option<String>,
    /// New refresh token.
    pub refresh_token: Option<String>,
    /// New cached identity.
    pub identity: Option<Identity>,
}

impl SessionUpdate {
    /// Replaces only the access token, as a refresh does.
    #[must_use]
    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Writes a complete session, as a login does.
    #[must_use]
    pub fn login(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        identity: Option<Identity>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            identity,
        }
    }
}

impl From<Session> for SessionUpdate {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            identity: session.identity,
        }
    }
}

/// Formats a bearer `Authorization` header value.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Shortened token for logs (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let cut = token
            .char_indices()
            .nth(8)
            .map_or(token.len(), |(index, _)| index);
        format!("{}...", &token[..cut])
    } else {
        token.to_string()
    }
}
