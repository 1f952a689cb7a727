//! Lifecycle events published to the notification collaborator.

use super::{LifecycleEvent, PitchingId, ReleaseId, ReleaseStatus, Role, UserId};
use serde::{Deserialize, Serialize};

/// Something interested parties should hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReleaseEvent {
    /// A release changed moderation status.
    StatusChanged {
        /// Affected release.
        release_id: ReleaseId,
        /// Release name at the time of the change.
        release_name: String,
        /// Operation that caused the change.
        event: LifecycleEvent,
        /// Status before the change.
        from: ReleaseStatus,
        /// Status after the change.
        to: ReleaseStatus,
        /// Reviewer comment, for review decisions.
        comment: Option<String>,
    },
    /// A pitching was attached to an approved release.
    PitchingSubmitted {
        /// Promoted release.
        release_id: ReleaseId,
        /// Release name.
        release_name: String,
        /// New pitching.
        pitching_id: PitchingId,
    },
}

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Recipients {
    /// Every user holding one of the roles.
    Roles(Vec<Role>),
    /// A single user.
    User(UserId),
}

impl Recipients {
    /// Managers and directors, who moderate releases.
    #[must_use]
    pub fn reviewers() -> Self {
        Self::Roles(vec![Role::Manager, Role::Director])
    }
}

/// An event and its recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// What happened.
    pub event: ReleaseEvent,
    /// Who should hear about it.
    pub recipients: Recipients,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub const fn new(event: ReleaseEvent, recipients: Recipients) -> Self {
        Self { event, recipients }
    }
}
