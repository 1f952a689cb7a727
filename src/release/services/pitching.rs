//! Service layer for pitching approved releases.

use super::{
    error::{ReleaseServiceError, ReleaseServiceResult},
    support::{deliver, load_release, upload_all},
};
use crate::release::{
    domain::{
        Actor, AssetSlot, AssetUpload, Notification, Pitching, PitchingDraft, PreconditionError,
        Recipients, Release, ReleaseConfig, ReleaseDomainError, ReleaseEvent, ReleaseId,
        ReleaseStatus, Role,
    },
    ports::{
        AssetUploader, Notifier, PitchingRepository, PitchingRepositoryError, ReleaseRepository,
    },
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Pitching orchestration service.
///
/// The approval gate is checked on the loaded release and again by the
/// repository when the pitching is inserted, so a release reset in between
/// never gains a pitching.
pub struct PitchingService<R, P, U, N, C>
where
    R: ReleaseRepository,
    P: PitchingRepository,
    U: AssetUploader,
    N: Notifier,
    C: Clock + Send + Sync,
{
    releases: Arc<R>,
    pitchings: Arc<P>,
    uploader: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<C>,
    config: ReleaseConfig,
}

impl<R, P, U, N, C> Clone for PitchingService<R, P, U, N, C>
where
    R: ReleaseRepository,
    P: PitchingRepository,
    U: AssetUploader,
    N: Notifier,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            releases: Arc::clone(&self.releases),
            pitchings: Arc::clone(&self.pitchings),
            uploader: Arc::clone(&self.uploader),
            notifier: Arc::clone(&self.notifier),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<R, P, U, N, C> PitchingService<R, P, U, N, C>
where
    R: ReleaseRepository,
    P: PitchingRepository,
    U: AssetUploader,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a pitching service with the default configuration.
    #[must_use]
    pub fn new(
        releases: Arc<R>,
        pitchings: Arc<P>,
        uploader: Arc<U>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            releases,
            pitchings,
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

    /// Attaches a pitching to an approved release.
    ///
    /// Several pitchings per release are accepted; the newest one is the
    /// current pitch.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::NotFound`] for an unknown
    /// release, a forbidden error for non-owners, a precondition error
    /// unless the release is approved, or the payload validation errors.
    pub async fn submit_pitching(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        draft: PitchingDraft,
    ) -> ReleaseServiceResult<Pitching> {
        let release = load_release(&*self.releases, release_id).await?;
        self.store_pitching(&release, actor, draft).await
    }

    /// Uploads photos in parallel and then attaches the pitching.
    ///
    /// Uploaded photos are appended after the photos already in `draft`.
    /// The release gate is checked before anything is uploaded.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::submit_pitching`], plus a
    /// validation error naming each photo whose upload failed.
    pub async fn submit_pitching_with_uploads(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        mut draft: PitchingDraft,
        photos: Vec<AssetUpload>,
    ) -> ReleaseServiceResult<Pitching> {
        let release = load_release(&*self.releases, release_id).await?;
        release.ensure_pitchable(actor)?;

        let offset = draft.photos.len();
        let uploads = photos
            .into_iter()
            .enumerate()
            .map(|(index, upload)| (AssetSlot::PitchingPhoto(offset + index), upload))
            .collect();
        let uploaded = upload_all(&*self.uploader, uploads)
            .await
            .map_err(ReleaseDomainError::from)?;
        draft
            .photos
            .extend(uploaded.into_iter().map(|(_, asset)| asset));

        self.store_pitching(&release, actor, draft).await
    }

    /// Returns the most recent pitching for a release.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::PitchingRepository`] when the
    /// lookup fails.
    pub async fn latest_pitching(
        &self,
        release_id: ReleaseId,
    ) -> ReleaseServiceResult<Option<Pitching>> {
        let mut pitchings = self.pitchings.find_by_release(release_id).await?;
        Ok(pitchings.pop())
    }

    /// Returns every pitching for a release, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError::PitchingRepository`] when the
    /// lookup fails.
    pub async fn list_pitchings(
        &self,
        release_id: ReleaseId,
    ) -> ReleaseServiceResult<Vec<Pitching>> {
        Ok(self.pitchings.find_by_release(release_id).await?)
    }

    async fn store_pitching(
        &self,
        release: &Release,
        actor: &Actor,
        draft: PitchingDraft,
    ) -> ReleaseServiceResult<Pitching> {
        let pitching = Pitching::submit(release, actor, draft, &self.config, &*self.clock)?;
        self.pitchings
            .store_if_release_status(&pitching, ReleaseStatus::Approved)
            .await
            .map_err(gate_failure)?;
        info!(
            release_id = %release.id(),
            pitching_id = %pitching.id(),
            actor_id = %actor.id(),
            photos = pitching.photos().len(),
            "pitching submitted"
        );

        let event = ReleaseEvent::PitchingSubmitted {
            release_id: release.id(),
            release_name: release.name().to_owned(),
            pitching_id: pitching.id(),
        };
        deliver(
            &*self.notifier,
            Notification::new(event.clone(), Recipients::User(release.owner_id())),
        )
        .await;
        deliver(
            &*self.notifier,
            Notification::new(event, Recipients::Roles(vec![Role::Director])),
        )
        .await;
        Ok(pitching)
    }
}

fn gate_failure(err: PitchingRepositoryError) -> ReleaseServiceError {
    match err {
        PitchingRepositoryError::ReleaseStatusMismatch {
            release_id, actual, ..
        } => {
            warn!(
                release_id = %release_id,
                actual = %actual,
                "release left approved before pitching was stored"
            );
            ReleaseDomainError::from(PreconditionError::ReleaseNotApproved {
                release_id,
                status: actual,
            })
            .into()
        }
        PitchingRepositoryError::ReleaseNotFound(release_id) => {
            ReleaseServiceError::NotFound(release_id)
        }
        other => other.into(),
    }
}
