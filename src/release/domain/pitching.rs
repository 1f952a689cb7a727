//! Promotional pitching attached to an approved release.

use super::{
    Actor, AssetRef, PitchingId, Release, ReleaseConfig, ReleaseDomainError, ReleaseId, UserId,
    ValidationError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use url::Url;

/// Unvalidated pitching payload as entered by the artist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PitchingDraft {
    /// Who the artist is.
    pub artist_description: String,
    /// What the release is.
    pub release_description: String,
    /// Why the release fits the targeted playlists.
    pub playlist_fit: String,
    /// Current audience and reach.
    pub current_reach: String,
    /// Link to a listenable preview.
    pub preview_link: String,
    /// Press photos.
    pub photos: Vec<AssetRef>,
}

/// Validated pitching submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitching {
    id: PitchingId,
    release_id: ReleaseId,
    submitted_by: UserId,
    artist_description: String,
    release_description: String,
    playlist_fit: String,
    current_reach: String,
    preview_link: Url,
    photos: Vec<AssetRef>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted pitching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPitchingData {
    /// Persisted pitching identifier.
    pub id: PitchingId,
    /// Release the pitching belongs to.
    pub release_id: ReleaseId,
    /// Artist who submitted it.
    pub submitted_by: UserId,
    /// Persisted artist description.
    pub artist_description: String,
    /// Persisted release description.
    pub release_description: String,
    /// Persisted playlist fit text.
    pub playlist_fit: String,
    /// Persisted reach text.
    pub current_reach: String,
    /// Persisted preview link.
    pub preview_link: Url,
    /// Persisted photos.
    pub photos: Vec<AssetRef>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Pitching {
    /// Creates a pitching for `release` on behalf of `actor`.
    ///
    /// The release gate is checked before the payload, so a pitching for an
    /// unapproved release reports the precondition even if the payload is
    /// also incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseDomainError::Forbidden`] for non-owners,
    /// [`ReleaseDomainError::Precondition`] unless the release is approved,
    /// or the collected validation errors of the payload.
    pub fn submit(
        release: &Release,
        actor: &Actor,
        draft: PitchingDraft,
        config: &ReleaseConfig,
        clock: &impl Clock,
    ) -> Result<Self, ReleaseDomainError> {
        release.ensure_pitchable(actor)?;
        let preview_link = validate_draft(&draft, config)?;
        Ok(Self {
            id: PitchingId::new(),
            release_id: release.id(),
            submitted_by: actor.id(),
            artist_description: draft.artist_description.trim().to_owned(),
            release_description: draft.release_description.trim().to_owned(),
            playlist_fit: draft.playlist_fit.trim().to_owned(),
            current_reach: draft.current_reach.trim().to_owned(),
            preview_link,
            photos: draft.photos,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a pitching from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPitchingData) -> Self {
        Self {
            id: data.id,
            release_id: data.release_id,
            submitted_by: data.submitted_by,
            artist_description: data.artist_description,
            release_description: data.release_description,
            playlist_fit: data.playlist_fit,
            current_reach: data.current_reach,
            preview_link: data.preview_link,
            photos: data.photos,
            created_at: data.created_at,
        }
    }

    /// Returns the pitching identifier.
    #[must_use]
    pub const fn id(&self) -> PitchingId {
        self.id
    }

    /// Returns the release this pitching promotes.
    #[must_use]
    pub const fn release_id(&self) -> ReleaseId {
        self.release_id
    }

    /// Returns the submitting artist.
    #[must_use]
    pub const fn submitted_by(&self) -> UserId {
        self.submitted_by
    }

    /// Returns the artist description.
    #[must_use]
    pub fn artist_description(&self) -> &str {
        &self.artist_description
    }

    /// Returns the release description.
    #[must_use]
    pub fn release_description(&self) -> &str {
        &self.release_description
    }

    /// Returns the playlist fit text.
    #[must_use]
    pub fn playlist_fit(&self) -> &str {
        &self.playlist_fit
    }

    /// Returns the current reach text.
    #[must_use]
    pub fn current_reach(&self) -> &str {
        &self.current_reach
    }

    /// Returns the preview link.
    #[must_use]
    pub const fn preview_link(&self) -> &Url {
        &self.preview_link
    }

    /// Returns the press photos.
    #[must_use]
    pub fn photos(&self) -> &[AssetRef] {
        &self.photos
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validate_draft(draft: &PitchingDraft, config: &ReleaseConfig) -> Result<Url, ValidationError> {
    let mut errors = Vec::new();
    let required = [
        ("artist description", &draft.artist_description),
        ("release description", &draft.release_description),
        ("playlist fit", &draft.playlist_fit),
        ("current reach", &draft.current_reach),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyField(name));
        }
    }

    let count = draft.photos.len();
    if count < config.min_pitching_photos || count > config.max_pitching_photos {
        errors.push(ValidationError::PhotoCount {
            count,
            min: config.min_pitching_photos,
            max: config.max_pitching_photos,
        });
    }

    let preview_link = parse_preview_link(&draft.preview_link);
    if preview_link.is_none() {
        errors.push(ValidationError::InvalidPreviewLink(draft.preview_link.clone()));
    }

    match (ValidationError::from_many(errors), preview_link) {
        (Some(err), _) => Err(err),
        (None, Some(url)) => Ok(url),
        (None, None) => Err(ValidationError::InvalidPreviewLink(draft.preview_link.clone())),
    }
}

fn parse_preview_link(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}
