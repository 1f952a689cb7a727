//! Release aggregate root and its moderation state machine.

use super::{
    Actor, AssetRef, LifecycleEvent, PreconditionError, ReleaseConfig, ReleaseDomainError,
    ReleaseId, ReleaseStatus, ReviewOutcome, ReviewRecord, Role, TrackList, UserId,
    ValidationError,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive metadata of a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDetails {
    /// Release title.
    pub name: String,
    /// Cover image, required before submission.
    pub cover: Option<AssetRef>,
    /// Street date, required before submission.
    pub release_date: Option<NaiveDate>,
    /// Date preorders open.
    pub preorder_date: Option<NaiveDate>,
    /// Date sales start.
    pub sales_start_date: Option<NaiveDate>,
    /// Genre label.
    pub genre: Option<String>,
    /// Copyright line.
    pub copyright: Option<String>,
    /// Store price tier.
    pub price_category: Option<String>,
    /// Language of the release title.
    pub title_language: Option<String>,
}

impl ReleaseDetails {
    /// Creates details with only the name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the cover asset.
    #[must_use]
    pub fn with_cover(mut self, cover: AssetRef) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Sets the release date.
    #[must_use]
    pub const fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }

    /// Sets the genre.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Sets the copyright line.
    #[must_use]
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    fn validated(mut self) -> Result<Self, ValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("release name"));
        }
        self.name = trimmed.to_owned();
        Ok(self)
    }
}

/// Release aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    id: ReleaseId,
    owner_id: UserId,
    details: ReleaseDetails,
    tracks: TrackList,
    status: ReleaseStatus,
    review: Option<ReviewRecord>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Status and revision a write was based on.
///
/// Stores compare both before replacing a release, so a write made from a
/// stale read is refused instead of overwriting a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    /// Status that was read.
    pub status: ReleaseStatus,
    /// Revision that was read.
    pub revision: u64,
}

/// Parameter object for reconstructing a persisted release aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReleaseData {
    /// Persisted release identifier.
    pub id: ReleaseId,
    /// Persisted owning artist.
    pub owner_id: UserId,
    /// Persisted descriptive metadata.
    pub details: ReleaseDetails,
    /// Persisted tracks.
    pub tracks: TrackList,
    /// Persisted moderation status.
    pub status: ReleaseStatus,
    /// Persisted review decision, if any.
    pub review: Option<ReviewRecord>,
    /// Persisted revision counter.
    pub revision: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Release {
    /// Creates a draft release owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] when `owner` is not an
    /// artist, or a validation error for a blank name.
    pub fn new_draft(
        owner: &Actor,
        details: ReleaseDetails,
        clock: &impl Clock,
    ) -> Result<Self, ReleaseDomainError> {
        if *owner.role() != Role::Artist {
            return Err(ReleaseDomainError::Forbidden {
                actor_id: owner.id(),
                event: LifecycleEvent::Edit,
            });
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ReleaseId::new(),
            owner_id: owner.id(),
            details: details.validated()?,
            tracks: TrackList::new(),
            status: ReleaseStatus::Draft,
            review: None,
            revision: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a release from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReleaseData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            details: data.details,
            tracks: data.tracks,
            status: data.status,
            review: data.review,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the release identifier.
    #[must_use]
    pub const fn id(&self) -> ReleaseId {
        self.id
    }

    /// Returns the owning artist.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the descriptive metadata.
    #[must_use]
    pub const fn details(&self) -> &ReleaseDetails {
        &self.details
    }

    /// Returns the release name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.details.name
    }

    /// Returns the ordered tracks.
    #[must_use]
    pub const fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    /// Returns the moderation status.
    #[must_use]
    pub const fn status(&self) -> ReleaseStatus {
        self.status
    }

    /// Returns the latest review decision, if one is recorded.
    #[must_use]
    pub const fn review(&self) -> Option<&ReviewRecord> {
        self.review.as_ref()
    }

    /// Returns the revision counter, bumped by every change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the status and revision to guard a write of this release.
    #[must_use]
    pub const fn version(&self) -> ReleaseVersion {
        ReleaseVersion {
            status: self.status,
            revision: self.revision,
        }
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `actor` owns this release.
    #[must_use]
    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        self.owner_id == actor.id()
    }

    /// Replaces the descriptive metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners,
    /// [`ReleaseDomainError::InvalidTransition`] when the status does not
    /// allow edits, or a validation error for a blank name.
    pub fn update_details(
        &mut self,
        actor: &Actor,
        details: ReleaseDetails,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        self.ensure_editable(actor)?;
        self.details = details.validated()?;
        self.touch(clock);
        Ok(())
    }

    /// Binds a cover asset.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners or
    /// [`ReleaseDomainError::InvalidTransition`] when the status does not
    /// allow edits.
    pub fn set_cover(
        &mut self,
        actor: &Actor,
        cover: AssetRef,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        self.ensure_editable(actor)?;
        self.details.cover = Some(cover);
        self.touch(clock);
        Ok(())
    }

    /// Applies `edit` to the track list.
    ///
    /// The list is only replaced when `edit` succeeds, so a failed edit leaves
    /// the numbering untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners,
    /// [`ReleaseDomainError::InvalidTransition`] when the status does not
    /// allow edits, or the validation error raised by `edit`.
    pub fn edit_tracks<T>(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
        edit: impl FnOnce(&mut TrackList) -> Result<T, ValidationError>,
    ) -> Result<T, ReleaseDomainError> {
        self.ensure_editable(actor)?;
        let mut staged = self.tracks.clone();
        let output = edit(&mut staged)?;
        self.tracks = staged;
        self.touch(clock);
        Ok(output)
    }

    /// Collects every reason the release cannot enter moderation.
    #[must_use]
    pub fn submission_errors(&self, config: &ReleaseConfig) -> Option<ValidationError> {
        let mut errors = Vec::new();
        if self.details.cover.is_none() {
            errors.push(ValidationError::MissingCover);
        }
        if self.details.release_date.is_none() {
            errors.push(ValidationError::MissingReleaseDate);
        }
        if self.tracks.is_empty() {
            errors.push(ValidationError::EmptyTrackList);
        }
        for track in &self.tracks {
            errors.extend(track.submission_errors(config));
        }
        ValidationError::from_many(errors)
    }

    /// Submits a draft for moderation.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners,
    /// [`ReleaseDomainError::InvalidTransition`] unless the release is a
    /// draft, or the collected validation errors.
    pub fn submit(
        &mut self,
        actor: &Actor,
        config: &ReleaseConfig,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        self.ensure_owner(actor, LifecycleEvent::Submit)?;
        self.ensure_status(ReleaseStatus::Draft, LifecycleEvent::Submit)?;
        self.enter_moderation(config, clock)
    }

    /// Records a reviewer decision on a pending release.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] unless `reviewer` is a
    /// manager or director, or [`ReleaseDomainError::InvalidTransition`]
    /// unless the release is pending.
    pub fn record_review(
        &mut self,
        reviewer: &Actor,
        outcome: &ReviewOutcome,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        let event = outcome.verdict().event();
        if !reviewer.can_review() {
            return Err(ReleaseDomainError::Forbidden {
                actor_id: reviewer.id(),
                event,
            });
        }
        self.ensure_status(ReleaseStatus::Pending, event)?;
        self.status = outcome.verdict().target_status();
        self.review = Some(ReviewRecord::stamp(outcome, reviewer, clock.utc()));
        self.touch(clock);
        Ok(())
    }

    /// Returns a fixable rejection to moderation.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::InvalidTransition`] unless the release is
    /// `rejected_fixable` and `actor` owns it, or the collected validation
    /// errors.
    pub fn resubmit(
        &mut self,
        actor: &Actor,
        config: &ReleaseConfig,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        if self.status != ReleaseStatus::RejectedFixable || !self.is_owned_by(actor) {
            return Err(self.invalid_transition(LifecycleEvent::Resubmit));
        }
        self.enter_moderation(config, clock)
    }

    /// Sends a reviewed release back to moderation without touching its
    /// content.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] unless `reviewer` is a
    /// manager or director, or [`ReleaseDomainError::InvalidTransition`]
    /// unless a review decision is recorded.
    pub fn reset_to_pending(
        &mut self,
        reviewer: &Actor,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        if !reviewer.can_review() {
            return Err(ReleaseDomainError::Forbidden {
                actor_id: reviewer.id(),
                event: LifecycleEvent::ResetToPending,
            });
        }
        if !self.status.is_reviewed() {
            return Err(self.invalid_transition(LifecycleEvent::ResetToPending));
        }
        self.status = ReleaseStatus::Pending;
        self.review = None;
        self.touch(clock);
        Ok(())
    }

    /// Checks that `actor` may delete the release.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners or
    /// [`ReleaseDomainError::InvalidTransition`] while the release is pending
    /// or approved.
    pub fn ensure_deletable(&self, actor: &Actor) -> Result<(), ReleaseDomainError> {
        self.ensure_owner(actor, LifecycleEvent::Delete)?;
        if !self.status.is_deletable() {
            return Err(self.invalid_transition(LifecycleEvent::Delete));
        }
        Ok(())
    }

    /// Checks that `actor` may attach a pitching to this release.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners or
    /// [`PreconditionError::ReleaseNotApproved`] unless the release is
    /// approved.
    pub fn ensure_pitchable(&self, actor: &Actor) -> Result<(), ReleaseDomainError> {
        self.ensure_owner(actor, LifecycleEvent::Pitch)?;
        if self.status != ReleaseStatus::Approved {
            return Err(PreconditionError::ReleaseNotApproved {
                release_id: self.id,
                status: self.status,
            }
            .into());
        }
        Ok(())
    }

    fn enter_moderation(
        &mut self,
        config: &ReleaseConfig,
        clock: &impl Clock,
    ) -> Result<(), ReleaseDomainError> {
        if let Some(err) = self.submission_errors(config) {
            return Err(err.into());
        }
        self.status = ReleaseStatus::Pending;
        self.review = None;
        self.touch(clock);
        Ok(())
    }

    /// Checks that `actor` may change the release content.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners or
    /// [`ReleaseDomainError::InvalidTransition`] unless the status is
    /// `draft` or `rejected_fixable`.
    pub fn ensure_editable(&self, actor: &Actor) -> Result<(), ReleaseDomainError> {
        self.ensure_owner(actor, LifecycleEvent::Edit)?;
        if !self.status.is_editable() {
            return Err(self.invalid_transition(LifecycleEvent::Edit));
        }
        Ok(())
    }

    fn ensure_owner(&self, actor: &Actor, event: LifecycleEvent) -> Result<(), ReleaseDomainError> {
        if !self.is_owned_by(actor) {
            return Err(ReleaseDomainError::Forbidden {
                actor_id: actor.id(),
                event,
            });
        }
        Ok(())
    }

    fn ensure_status(
        &self,
        expected: ReleaseStatus,
        event: LifecycleEvent,
    ) -> Result<(), ReleaseDomainError> {
        if self.status != expected {
            return Err(self.invalid_transition(event));
        }
        Ok(())
    }

    const fn invalid_transition(&self, event: LifecycleEvent) -> ReleaseDomainError {
        ReleaseDomainError::InvalidTransition {
            release_id: self.id,
            from: self.status,
            event,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.revision = self.revision.saturating_add(1);
        self.updated_at = clock.utc();
    }
}
