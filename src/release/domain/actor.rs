//! Caller context supplied with every guarded operation.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard role reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Owns and submits releases.
    Artist,
    /// Reviews releases.
    Manager,
    /// Reviews releases and receives submission notifications.
    Director,
    /// A role string this crate does not know. Carries no privileges.
    Unrecognized(String),
}

impl Role {
    /// Maps an identity-provider role string onto a [`Role`].
    ///
    /// Unknown values become [`Role::Unrecognized`] rather than an error.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "artist" => Self::Artist,
            "manager" => Self::Manager,
            "director" => Self::Director,
            _ => Self::Unrecognized(value.to_owned()),
        }
    }

    /// Returns whether the role may moderate releases.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        matches!(self, Self::Manager | Self::Director)
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Artist => "artist",
            Self::Manager => "manager",
            Self::Director => "director",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    display_name: String,
    role: Role,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }

    /// Creates an artist actor with a fresh identifier.
    #[must_use]
    pub fn artist(display_name: impl Into<String>) -> Self {
        Self::new(UserId::new(), display_name, Role::Artist)
    }

    /// Creates a manager actor with a fresh identifier.
    #[must_use]
    pub fn manager(display_name: impl Into<String>) -> Self {
        Self::new(UserId::new(), display_name, Role::Manager)
    }

    /// Creates a director actor with a fresh identifier.
    #[must_use]
    pub fn director(display_name: impl Into<String>) -> Self {
        Self::new(UserId::new(), display_name, Role::Director)
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the name shown to other users.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Returns whether the caller may moderate releases.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        self.role.can_review()
    }
}
