//! Service layer for authoring, submitting, and moderating releases.

use super::{
    error::ReleaseServiceResult,
    support::{commit, deliver, load_release, remove, upload_all, upload_one},
};
use crate::release::{
    domain::{
        Actor, AssetSlot, AssetSource, AssetUpload, LifecycleEvent, Notification, Recipients,
        Release, ReleaseConfig, ReleaseDetails, ReleaseDomainError, ReleaseEvent, ReleaseId,
        ReleaseStatus, ReviewOutcome, ReviewVerdict, TrackDraft, TrackNumber, UserId,
    },
    ports::{AssetUploader, Notifier, ReleaseRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// A track supplied with a new submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSubmission {
    /// Track metadata. Audio already set here is kept unless `audio` is
    /// given.
    pub draft: TrackDraft,
    /// Audio source, if any.
    pub audio: Option<AssetSource>,
}

impl TrackSubmission {
    /// Creates a track submission with an audio source.
    #[must_use]
    pub fn new(draft: TrackDraft, audio: impl Into<AssetSource>) -> Self {
        Self {
            draft,
            audio: Some(audio.into()),
        }
    }

    /// Creates a track submission without audio.
    #[must_use]
    pub const fn without_audio(draft: TrackDraft) -> Self {
        Self { draft, audio: None }
    }
}

/// A complete release submitted in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSubmission {
    details: ReleaseDetails,
    cover: Option<AssetSource>,
    tracks: Vec<TrackSubmission>,
}

impl ReleaseSubmission {
    /// Creates a submission from release metadata.
    #[must_use]
    pub const fn new(details: ReleaseDetails) -> Self {
        Self {
            details,
            cover: None,
            tracks: Vec::new(),
        }
    }

    /// Sets the cover source.
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<AssetSource>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    /// Appends a track.
    #[must_use]
    pub fn with_track(mut self, track: TrackSubmission) -> Self {
        self.tracks.push(track);
        self
    }
}

/// Request payload for a moderation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    /// Release under review.
    pub release_id: ReleaseId,
    /// Decision.
    pub verdict: ReviewVerdict,
    /// Reviewer comment; required for rejections.
    pub comment: String,
}

impl ReviewRequest {
    /// Creates a review request.
    #[must_use]
    pub fn new(release_id: ReleaseId, verdict: ReviewVerdict, comment: impl Into<String>) -> Self {
        Self {
            release_id,
            verdict,
            comment: comment.into(),
        }
    }
}

/// Release lifecycle orchestration service.
///
/// Every transition reads the release, applies the domain rule to the loaded
/// copy, and writes it back with a compare-and-set on the status and
/// revision it read.
pub struct ReleaseLifecycleService<R, U, N, C>
where
    R: ReleaseRepository,
    U: AssetUploader,
    N: Notifier,
    C: Clock + Send + Sync,
{
    releases: Arc<R>,
    uploader: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<C>,
    config: ReleaseConfig,
}

impl<R, U, N, C> Clone for ReleaseLifecycleService<R, U, N, C>
where
    R: ReleaseRepository,
    U: AssetUploader,
    N: Notifier,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            releases: Arc::clone(&self.releases),
            uploader: Arc::clone(&self.uploader),
            notifier: Arc::clone(&self.notifier),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<R, U, N, C> ReleaseLifecycleService<R, U, N, C>
where
    R: ReleaseRepository,
    U: AssetUploader,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a lifecycle service with the default configuration.
    #[must_use]
    pub fn new(
        releases: Arc<R>,
        uploader: Arc<U>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            releases,
            uploader,
            notifier,
            clock,
            config: ReleaseConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReleaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Creates and stores a draft release owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::Domain`] when `actor` is not an
    /// artist or the name is blank, or a repository error.
    pub async fn create_draft(
        &self,
        actor: &Actor,
        details: ReleaseDetails,
    ) -> ReleaseServiceResult<Release> {
        let release = Release::new_draft(actor, details, &*self.clock)?;
        self.releases.store(&release).await?;
        info!(release_id = %release.id(), actor_id = %actor.id(), "draft release created");
        Ok(release)
    }

    /// Replaces the metadata of an editable release.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing,
    /// not editable by `actor`, or the write loses a race.
    pub async fn update_details(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        details: ReleaseDetails,
    ) -> ReleaseServiceResult<Release> {
        let mut release = load_release(&*self.releases, release_id).await?;
        let expected = release.version();
        release.update_details(actor, details, &*self.clock)?;
        commit(&*self.releases, &release, expected, LifecycleEvent::Edit).await?;
        Ok(release)
    }

    /// Uploads a cover image and binds it to an editable release.
    ///
    /// Permissions are checked before the upload starts.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable, or a validation error naming the cover slot when the
    /// upload fails.
    pub async fn attach_cover(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        upload: AssetUpload,
    ) -> ReleaseServiceResult<Release> {
        let mut release = load_release(&*self.releases, release_id).await?;
        release.ensure_editable(actor)?;
        let expected = release.version();

        let cover = upload_one(&*self.uploader, AssetSlot::Cover, upload)
            .await
            .map_err(ReleaseDomainError::from)?;
        release.set_cover(actor, cover, &*self.clock)?;
        commit(&*self.releases, &release, expected, LifecycleEvent::Edit).await?;
        Ok(release)
    }

    /// Submits a stored draft for moderation.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing,
    /// `actor` is not the owner, the release is not a draft, or content is
    /// missing.
    pub async fn submit(&self, actor: &Actor, release_id: ReleaseId) -> ReleaseServiceResult<Release> {
        let mut release = load_release(&*self.releases, release_id).await?;
        let read = release.version();
        let from = read.status;
        release.submit(actor, &self.config, &*self.clock)?;
        commit(&*self.releases, &release, read, LifecycleEvent::Submit).await?;
        log_transition(&release, from, actor, LifecycleEvent::Submit);
        self.notify_reviewers(&release, from, LifecycleEvent::Submit)
            .await;
        Ok(release)
    }

    /// Builds, validates, and stores a release that enters moderation
    /// immediately.
    ///
    /// All pending uploads run in parallel. Nothing is stored unless every
    /// upload succeeds and the submission guard passes.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::Domain`] when `actor` is not an
    /// artist, an upload fails, or content is missing, or a repository
    /// error.
    pub async fn submit_new(
        &self,
        actor: &Actor,
        submission: ReleaseSubmission,
    ) -> ReleaseServiceResult<Release> {
        let ReleaseSubmission {
            details,
            cover,
            tracks,
        } = submission;
        let mut release = Release::new_draft(actor, details, &*self.clock)?;

        let mut uploads = Vec::new();
        let mut cover_ref = None;
        match cover {
            Some(AssetSource::Uploaded(asset)) => cover_ref = Some(asset),
            Some(AssetSource::Pending(upload)) => uploads.push((AssetSlot::Cover, upload)),
            None => {}
        }
        let mut drafts = Vec::with_capacity(tracks.len());
        for (index, track) in tracks.into_iter().enumerate() {
            let mut draft = track.draft;
            match track.audio {
                Some(AssetSource::Uploaded(asset)) => draft.audio = Some(asset),
                Some(AssetSource::Pending(upload)) => uploads.push((
                    AssetSlot::TrackAudio(TrackNumber::from_index(index)),
                    upload,
                )),
                None => {}
            }
            drafts.push(draft);
        }

        let uploaded = upload_all(&*self.uploader, uploads)
            .await
            .map_err(ReleaseDomainError::from)?;
        for (slot, asset) in uploaded {
            match slot {
                AssetSlot::Cover => cover_ref = Some(asset),
                AssetSlot::TrackAudio(number) => {
                    if let Some(draft) = drafts.get_mut(number.index()) {
                        draft.audio = Some(asset);
                    }
                }
                AssetSlot::PitchingPhoto(_) => {}
            }
        }

        if let Some(cover_asset) = cover_ref {
            release.set_cover(actor, cover_asset, &*self.clock)?;
        }
        release.edit_tracks(actor, &*self.clock, |list| list.add_many(drafts, &self.config))?;
        let from = release.status();
        release.submit(actor, &self.config, &*self.clock)?;

        self.releases.store(&release).await?;
        log_transition(&release, from, actor, LifecycleEvent::Submit);
        self.notify_reviewers(&release, from, LifecycleEvent::Submit)
            .await;
        Ok(release)
    }

    /// Records a moderation decision on a pending release.
    ///
    /// The comment is validated before the release is loaded. The owner is
    /// notified of the decision.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when a rejection has no
    /// comment, the release is missing, `reviewer` may not moderate, or the
    /// release is not pending (including when another reviewer decided
    /// first).
    pub async fn review(
        &self,
        reviewer: &Actor,
        request: ReviewRequest,
    ) -> ReleaseServiceResult<Release> {
        let outcome = ReviewOutcome::from_parts(request.verdict, &request.comment)
            .map_err(ReleaseDomainError::from)?;
        let event = outcome.verdict().event();

        let mut release = load_release(&*self.releases, request.release_id).await?;
        let read = release.version();
        let from = read.status;
        release.record_review(reviewer, &outcome, &*self.clock)?;
        commit(&*self.releases, &release, read, event).await?;
        log_transition(&release, from, reviewer, event);
        self.notify_owner(&release, from, event, outcome.comment().map(str::to_owned))
            .await;
        Ok(release)
    }

    /// Returns a fixable rejection to moderation.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing,
    /// is not `rejected_fixable`, is not owned by `actor`, or content is
    /// missing.
    pub async fn resubmit(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
    ) -> ReleaseServiceResult<Release> {
        let mut release = load_release(&*self.releases, release_id).await?;
        let read = release.version();
        let from = read.status;
        release.resubmit(actor, &self.config, &*self.clock)?;
        commit(&*self.releases, &release, read, LifecycleEvent::Resubmit).await?;
        log_transition(&release, from, actor, LifecycleEvent::Resubmit);
        self.notify_reviewers(&release, from, LifecycleEvent::Resubmit)
            .await;
        Ok(release)
    }

    /// Sends a reviewed release back to moderation, clearing the decision.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing,
    /// `reviewer` may not moderate, or no decision is recorded.
    pub async fn reset_to_pending(
        &self,
        reviewer: &Actor,
        release_id: ReleaseId,
    ) -> ReleaseServiceResult<Release> {
        let mut release = load_release(&*self.releases, release_id).await?;
        let read = release.version();
        let from = read.status;
        release.reset_to_pending(reviewer, &*self.clock)?;
        commit(
            &*self.releases,
            &release,
            read,
            LifecycleEvent::ResetToPending,
        )
        .await?;
        log_transition(&release, from, reviewer, LifecycleEvent::ResetToPending);
        self.notify_owner(&release, from, LifecycleEvent::ResetToPending, None)
            .await;
        Ok(release)
    }

    /// Deletes a release with its tracks and pitchings.
    ///
    /// The repository removes all three in one unit, so a failed delete
    /// leaves the release and its pitchings in place.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing,
    /// `actor` is not the owner, or the release is pending or approved.
    pub async fn delete(&self, actor: &Actor, release_id: ReleaseId) -> ReleaseServiceResult<()> {
        let release = load_release(&*self.releases, release_id).await?;
        release.ensure_deletable(actor)?;
        let expected = release.status();

        remove(&*self.releases, release_id, expected).await?;
        info!(release_id = %release_id, actor_id = %actor.id(), "release deleted");
        Ok(())
    }

    /// Retrieves a release by identifier.
    ///
    /// Returns `Ok(None)` when no such release exists.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::Repository`] when the lookup
    /// fails.
    pub async fn find_by_id(&self, release_id: ReleaseId) -> ReleaseServiceResult<Option<Release>> {
        Ok(self.releases.find_by_id(release_id).await?)
    }

    /// Lists an artist's releases, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::Repository`] when the lookup
    /// fails.
    pub async fn list_by_owner(&self, owner_id: UserId) -> ReleaseServiceResult<Vec<Release>> {
        Ok(self.releases.find_by_owner(owner_id).await?)
    }

    /// Lists releases in a status, oldest first.
    ///
    /// With [`ReleaseStatus::Pending`] this is the moderation queue.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::Repository`] when the lookup
    /// fails.
    pub async fn list_by_status(
        &self,
        status: ReleaseStatus,
    ) -> ReleaseServiceResult<Vec<Release>> {
        Ok(self.releases.find_by_status(status).await?)
    }

    async fn notify_reviewers(&self, release: &Release, from: ReleaseStatus, event: LifecycleEvent) {
        if !self.config.notify_reviewers_on_submit {
            return;
        }
        let notification = Notification::new(
            status_changed(release, from, event, None),
            Recipients::reviewers(),
        );
        deliver(&*self.notifier, notification).await;
    }

    async fn notify_owner(
        &self,
        release: &Release,
        from: ReleaseStatus,
        event: LifecycleEvent,
        comment: Option<String>,
    ) {
        let notification = Notification::new(
            status_changed(release, from, event, comment),
            Recipients::User(release.owner_id()),
        );
        deliver(&*self.notifier, notification).await;
    }
}

fn status_changed(
    release: &Release,
    from: ReleaseStatus,
    event: LifecycleEvent,
    comment: Option<String>,
) -> ReleaseEvent {
    ReleaseEvent::StatusChanged {
        release_id: release.id(),
        release_name: release.name().to_owned(),
        event,
        from,
        to: release.status(),
        comment,
    }
}

fn log_transition(release: &Release, from: ReleaseStatus, actor: &Actor, event: LifecycleEvent) {
    info!(
        release_id = %release.id(),
        from = %from,
        to = %release.status(),
        event = %event,
        actor_id = %actor.id(),
        "release transitioned"
    );
}
