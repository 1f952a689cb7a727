//! Review decisions and the record stamped onto a reviewed release.

use super::{
    Actor, LifecycleEvent, ParseReviewVerdictError, ReleaseStatus, UserId, ValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reviewer verdict as chosen in a moderation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    /// Accept the release.
    Approved,
    /// Reject with problems the artist can fix.
    RejectedFixable,
    /// Reject permanently.
    RejectedFinal,
}

impl ReviewVerdict {
    /// Returns the status a release enters under this verdict.
    #[must_use]
    pub const fn target_status(self) -> ReleaseStatus {
        match self {
            Self::Approved => ReleaseStatus::Approved,
            Self::RejectedFixable => ReleaseStatus::RejectedFixable,
            Self::RejectedFinal => ReleaseStatus::RejectedFinal,
        }
    }

    /// Returns the lifecycle event this verdict represents.
    #[must_use]
    pub const fn event(self) -> LifecycleEvent {
        match self {
            Self::Approved => LifecycleEvent::Approve,
            Self::RejectedFixable => LifecycleEvent::RejectFixable,
            Self::RejectedFinal => LifecycleEvent::RejectFinal,
        }
    }
}

impl TryFrom<&str> for ReviewVerdict {
    type Error = ParseReviewVerdictError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "rejected_fixable" => Ok(Self::RejectedFixable),
            "rejected_final" => Ok(Self::RejectedFinal),
            _ => Err(ParseReviewVerdictError(value.to_owned())),
        }
    }
}

/// Non-empty reviewer comment required for rejections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewComment(String);

impl ReviewComment {
    /// Creates a trimmed, non-empty comment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyReviewComment`] for empty or
    /// whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyReviewComment);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the comment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated review decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Accept the release, optionally with a note.
    Approved {
        /// Optional reviewer note.
        comment: Option<String>,
    },
    /// Reject with fixable problems.
    RejectedFixable(ReviewComment),
    /// Reject permanently.
    RejectedFinal(ReviewComment),
}

impl ReviewOutcome {
    /// Builds an outcome from a verdict and raw comment text.
    ///
    /// An approval keeps a non-blank comment as its note. Rejections require
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyReviewComment`] when a rejection comes
    /// with an empty or whitespace-only comment.
    pub fn from_parts(verdict: ReviewVerdict, comment: &str) -> Result<Self, ValidationError> {
        match verdict {
            ReviewVerdict::Approved => {
                let note = comment.trim();
                Ok(Self::Approved {
                    comment: (!note.is_empty()).then(|| note.to_owned()),
                })
            }
            ReviewVerdict::RejectedFixable => {
                Ok(Self::RejectedFixable(ReviewComment::new(comment)?))
            }
            ReviewVerdict::RejectedFinal => Ok(Self::RejectedFinal(ReviewComment::new(comment)?)),
        }
    }

    /// Returns the verdict of this outcome.
    #[must_use]
    pub const fn verdict(&self) -> ReviewVerdict {
        match self {
            Self::Approved { .. } => ReviewVerdict::Approved,
            Self::RejectedFixable(_) => ReviewVerdict::RejectedFixable,
            Self::RejectedFinal(_) => ReviewVerdict::RejectedFinal,
        }
    }

    /// Returns the comment text, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Approved { comment } => comment.as_deref(),
            Self::RejectedFixable(comment) | Self::RejectedFinal(comment) => {
                Some(comment.as_str())
            }
        }
    }
}

/// Reviewer decision stored on a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Reviewer comment. Empty for an approval without a note.
    pub comment: String,
    /// Reviewer identifier.
    pub reviewer_id: UserId,
    /// Reviewer display name at review time.
    pub reviewer_name: String,
    /// Review timestamp.
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewRecord {
    /// Stamps a decision by `reviewer`.
    #[must_use]
    pub fn stamp(outcome: &ReviewOutcome, reviewer: &Actor, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            comment: outcome.comment().unwrap_or_default().to_owned(),
            reviewer_id: reviewer.id(),
            reviewer_name: reviewer.display_name().to_owned(),
            reviewed_at,
        }
    }
}
