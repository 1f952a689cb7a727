//! Error types for release domain validation, transitions, and parsing.

use super::{AssetSlot, LifecycleEvent, ReleaseId, ReleaseStatus, TrackField, TrackNumber, UserId};
use thiserror::Error;

/// A missing or malformed required field.
///
/// Callers recover by correcting the input and retrying the same operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The release has no cover asset.
    #[error("release cover is required")]
    MissingCover,

    /// The release has no release date.
    #[error("release date is required")]
    MissingReleaseDate,

    /// The release has no tracks.
    #[error("release must contain at least one track")]
    EmptyTrackList,

    /// A track lacks a field required for submission.
    #[error("track {track_number} is missing its {field}")]
    MissingTrackField {
        /// Position of the offending track.
        track_number: TrackNumber,
        /// The missing field.
        field: TrackField,
    },

    /// An audio asset exceeds the configured size ceiling.
    #[error("track {track_number} audio is {size} bytes, limit is {limit} bytes")]
    AudioTooLarge {
        /// Position of the offending track.
        track_number: TrackNumber,
        /// Actual asset size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// A required text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A rejection was requested without a comment.
    #[error("a rejection requires a non-empty review comment")]
    EmptyReviewComment,

    /// The number of pitching photos is outside the allowed bounds.
    #[error("pitching requires between {min} and {max} photos, got {count}")]
    PhotoCount {
        /// Number of photos supplied.
        count: usize,
        /// Minimum allowed.
        min: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// The pitching preview link is not an absolute http(s) URL.
    #[error("preview link '{0}' is not a valid http(s) URL")]
    InvalidPreviewLink(String),

    /// An asset URL returned by the upload collaborator could not be parsed.
    #[error("asset URL '{0}' is not a valid URL")]
    InvalidAssetUrl(String),

    /// A track position does not exist or a move would leave the list.
    #[error("track index {index} is out of range for {len} tracks")]
    TrackIndexOutOfRange {
        /// Zero-based position requested.
        index: usize,
        /// Current number of tracks.
        len: usize,
    },

    /// Uploading a specific asset failed.
    #[error("upload of {slot} failed: {reason}")]
    AssetUpload {
        /// The asset the failed upload was meant for.
        slot: AssetSlot,
        /// Collaborator-supplied failure description.
        reason: String,
    },

    /// Several validation failures were found at once.
    #[error("{} validation errors: {}", .0.len(), format_errors(.0))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collapses a list of failures into a single error.
    ///
    /// Returns `None` for an empty list and the sole error for a single
    /// failure.
    #[must_use]
    pub fn from_many(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Returns the individual failures, flattening [`Self::Multiple`].
    #[must_use]
    pub fn flatten(&self) -> Vec<&Self> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A cross-entity gate failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreconditionError {
    /// Pitching requires an approved release.
    #[error("release {release_id} must be approved before pitching (current status: {status})")]
    ReleaseNotApproved {
        /// Release the pitching was requested for.
        release_id: ReleaseId,
        /// Status the release was found in.
        status: ReleaseStatus,
    },
}

/// Errors returned by release aggregate operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReleaseDomainError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation is not legal from the current status.
    #[error("cannot {event} release {release_id} while it is {from}")]
    InvalidTransition {
        /// Release the operation targeted.
        release_id: ReleaseId,
        /// Status the release was found in.
        from: ReleaseStatus,
        /// Requested lifecycle event.
        event: LifecycleEvent,
    },

    /// A cross-entity precondition failed.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The caller's role or ownership does not permit the operation.
    #[error("user {actor_id} is not permitted to {event} this release")]
    Forbidden {
        /// Caller identifier.
        actor_id: UserId,
        /// Requested lifecycle event.
        event: LifecycleEvent,
    },
}

/// Error returned while parsing release statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown release status: {0}")]
pub struct ParseReleaseStatusError(pub String);

/// Error returned while parsing review verdicts from requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review verdict: {0}")]
pub struct ParseReviewVerdictError(pub String);
