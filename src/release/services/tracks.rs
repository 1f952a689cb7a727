//! Service layer for editing the ordered track list of a release.

use super::{
    error::ReleaseServiceResult,
    support::{commit, load_release, upload_one},
};
use crate::release::{
    domain::{
        Actor, AssetRef, AssetSlot, AssetUpload, LifecycleEvent, MoveDirection, ReleaseConfig,
        ReleaseDomainError, ReleaseId, Track, TrackDraft, TrackList, TrackNumber,
        ValidationError,
    },
    ports::{AssetUploader, ReleaseRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Track ordering service.
///
/// Each operation reads the whole release, edits the track list on a copy,
/// and writes the release back in one guarded unit, so numbering is never
/// observed half-applied.
pub struct TrackOrderingService<R, U, C>
where
    R: ReleaseRepository,
    U: AssetUploader,
    C: Clock + Send + Sync,
{
    releases: Arc<R>,
    uploader: Arc<U>,
    clock: Arc<C>,
    config: ReleaseConfig,
}

impl<R, U, C> Clone for TrackOrderingService<R, U, C>
where
    R: ReleaseRepository,
    U: AssetUploader,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            releases: Arc::clone(&self.releases),
            uploader: Arc::clone(&self.uploader),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<R, U, C> TrackOrderingService<R, U, C>
where
    R: ReleaseRepository,
    U: AssetUploader,
    C: Clock + Send + Sync,
{
    /// Creates a track service with the default configuration.
    #[must_use]
    pub fn new(releases: Arc<R>, uploader: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            releases,
            uploader,
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

    /// Appends a track and returns its number.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable by `actor`, or the audio is too large.
    pub async fn add_track(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        draft: TrackDraft,
    ) -> ReleaseServiceResult<TrackNumber> {
        let config = &self.config;
        self.edit(actor, release_id, |tracks| tracks.add(draft, config))
            .await
    }

    /// Appends several tracks in order.
    ///
    /// Either every draft is appended or none is.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable by `actor`, or any audio is too large.
    pub async fn add_tracks(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        drafts: Vec<TrackDraft>,
    ) -> ReleaseServiceResult<Vec<TrackNumber>> {
        let config = &self.config;
        self.edit(actor, release_id, |tracks| tracks.add_many(drafts, config))
            .await
    }

    /// Removes the track at `index` and closes the gap.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable by `actor`, or `index` is out of range.
    pub async fn remove_track(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        index: usize,
    ) -> ReleaseServiceResult<Track> {
        self.edit(actor, release_id, |tracks| tracks.remove(index))
            .await
    }

    /// Swaps the track at `index` with its neighbour.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable by `actor`, or the move leaves the list.
    pub async fn move_track(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        index: usize,
        direction: MoveDirection,
    ) -> ReleaseServiceResult<TrackNumber> {
        self.edit(actor, release_id, |tracks| {
            tracks.move_track(index, direction)
        })
        .await
    }

    /// Replaces the fields of the track at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable by `actor`, `index` is out of range, or the audio is too
    /// large.
    pub async fn update_track(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        index: usize,
        draft: TrackDraft,
    ) -> ReleaseServiceResult<()> {
        let config = &self.config;
        self.edit(actor, release_id, |tracks| {
            tracks.update(index, draft, config)
        })
        .await
    }

    /// Uploads an audio file and binds it to the track at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReleaseServiceError`] when the release is missing or
    /// not editable by `actor`, `index` is out of range, the upload fails
    /// (reported against the track's slot), or the audio is too large.
    pub async fn attach_audio_upload(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        index: usize,
        upload: AssetUpload,
    ) -> ReleaseServiceResult<AssetRef> {
        let mut release = load_release(&*self.releases, release_id).await?;
        release.ensure_editable(actor)?;
        let expected = release.version();
        let len = release.tracks().len();
        let number = release
            .tracks()
            .get(index)
            .map(Track::number)
            .ok_or(ReleaseDomainError::from(ValidationError::TrackIndexOutOfRange {
                index,
                len,
            }))?;

        let audio = upload_one(&*self.uploader, AssetSlot::TrackAudio(number), upload)
            .await
            .map_err(ReleaseDomainError::from)?;
        let config = &self.config;
        let bound = audio.clone();
        release.edit_tracks(actor, &*self.clock, |tracks| {
            tracks.attach_audio(index, bound, config)
        })?;
        commit(&*self.releases, &release, expected, LifecycleEvent::Edit).await?;
        debug!(release_id = %release_id, track_number = %number, "audio attached");
        Ok(audio)
    }

    async fn edit<T>(
        &self,
        actor: &Actor,
        release_id: ReleaseId,
        edit: impl FnOnce(&mut TrackList) -> Result<T, ValidationError>,
    ) -> ReleaseServiceResult<T> {
        let mut release = load_release(&*self.releases, release_id).await?;
        let expected = release.version();
        let output = release.edit_tracks(actor, &*self.clock, edit)?;
        commit(&*self.releases, &release, expected, LifecycleEvent::Edit).await?;
        debug!(
            release_id = %release_id,
            track_count = release.tracks().len(),
            "track list updated"
        );
        Ok(output)
    }
}
