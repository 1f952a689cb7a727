//! Domain model for the release submission and moderation lifecycle.
//!
//! The release domain models authoring, the moderation state machine, track
//! ordering, and the pitching gate while keeping all infrastructure concerns
//! outside of the domain boundary.

mod actor;
mod asset;
mod config;
mod error;
mod event;
mod ids;
mod pitching;
mod release;
mod review;
mod status;
mod track;

pub use actor::{Actor, Role};
pub use asset::{AssetRef, AssetSlot, AssetSource, AssetUpload};
pub use config::ReleaseConfig;
pub use error::{
    ParseReleaseStatusError, ParseReviewVerdictError, PreconditionError, ReleaseDomainError,
    ValidationError,
};
pub use event::{Notification, Recipients, ReleaseEvent};
pub use ids::{PitchingId, ReleaseId, TrackNumber, UserId};
pub use pitching::{PersistedPitchingData, Pitching, PitchingDraft};
pub use release::{PersistedReleaseData, Release, ReleaseDetails, ReleaseVersion};
pub use review::{ReviewComment, ReviewOutcome, ReviewRecord, ReviewVerdict};
pub use status::{LifecycleEvent, ReleaseStatus, StatusBadge};
pub use track::{MoveDirection, Track, TrackDraft, TrackField, TrackList};
