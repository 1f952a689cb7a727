//! Release lifecycle states and the events that move between them.

use super::ParseReleaseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation status of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    /// Being authored by the artist; not yet submitted.
    Draft,
    /// Submitted and awaiting moderation.
    Pending,
    /// Accepted by a reviewer. Eligible for pitching.
    Approved,
    /// Rejected with fixable problems; the owner may resubmit.
    RejectedFixable,
    /// Rejected permanently.
    RejectedFinal,
}

impl ReleaseStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::RejectedFixable,
        Self::RejectedFinal,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::RejectedFixable => "rejected_fixable",
            Self::RejectedFinal => "rejected_final",
        }
    }

    /// Returns whether the transition to `target` appears in the lifecycle
    /// table.
    ///
    /// This is the structural check only. Role, ownership, and content guards
    /// are enforced by the aggregate.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft | Self::RejectedFixable, Self::Pending)
                | (
                    Self::Pending,
                    Self::Approved | Self::RejectedFixable | Self::RejectedFinal
                )
                | (
                    Self::Approved | Self::RejectedFinal,
                    Self::Pending
                )
        )
    }

    /// Returns whether the engine defines no forward transition from this
    /// status, ignoring the moderator reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::RejectedFinal)
    }

    /// Returns whether a reviewer decision is recorded in this status.
    #[must_use]
    pub const fn is_reviewed(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::RejectedFixable | Self::RejectedFinal
        )
    }

    /// Returns whether the owner may change content in this status.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::RejectedFixable)
    }

    /// Returns whether the owner may delete the release in this status.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        matches!(
            self,
            Self::Draft | Self::RejectedFixable | Self::RejectedFinal
        )
    }

    /// Returns the display badge for dashboards.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Draft => StatusBadge::Neutral,
            Self::Pending => StatusBadge::Warning,
            Self::Approved => StatusBadge::Success,
            Self::RejectedFixable => StatusBadge::Attention,
            Self::RejectedFinal => StatusBadge::Danger,
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReleaseStatus {
    type Error = ParseReleaseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected_fixable" => Ok(Self::RejectedFixable),
            "rejected_final" => Ok(Self::RejectedFinal),
            _ => Err(ParseReleaseStatusError(value.to_owned())),
        }
    }
}

/// Visual variant used when rendering a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    /// Nothing to act on yet.
    Neutral,
    /// Waiting on a reviewer.
    Warning,
    /// Accepted.
    Success,
    /// Needs the artist's attention.
    Attention,
    /// Closed negatively.
    Danger,
}

/// Named lifecycle operations, used in errors and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Draft submitted for review.
    Submit,
    /// Reviewer approved.
    Approve,
    /// Reviewer rejected with a fixable verdict.
    RejectFixable,
    /// Reviewer rejected permanently.
    RejectFinal,
    /// Owner resubmitted after a fixable rejection.
    Resubmit,
    /// Reviewer sent a reviewed release back to moderation.
    ResetToPending,
    /// Owner changed release content.
    Edit,
    /// Owner deleted the release.
    Delete,
    /// Owner submitted a pitching.
    Pitch,
}

impl LifecycleEvent {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::RejectFixable => "reject_fixable",
            Self::RejectFinal => "reject_final",
            Self::Resubmit => "resubmit",
            Self::ResetToPending => "reset_to_pending",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Pitch => "pitch",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
