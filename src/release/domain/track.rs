//! Tracks and the densely numbered track list owned by a release.

use super::{AssetRef, ReleaseConfig, TrackNumber, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track fields required before a release can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackField {
    /// Track title.
    Title,
    /// Composer credit.
    Composer,
    /// Performance language.
    Language,
    /// Bound audio asset.
    Audio,
}

impl fmt::Display for TrackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Composer => "composer",
            Self::Language => "language",
            Self::Audio => "audio",
        })
    }
}

/// Editable track fields, used to add or replace a track.
///
/// Authoring may leave required fields blank; they are enforced at submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDraft {
    /// Track title.
    pub title: String,
    /// Composer credit.
    pub composer: String,
    /// Performance language.
    pub language: String,
    /// Bound audio asset, if uploaded.
    pub audio: Option<AssetRef>,
    /// Lyricist credit.
    pub lyricist: Option<String>,
    /// Full lyrics text.
    pub lyrics: Option<String>,
    /// Start of the short preview, in seconds.
    pub preview_offset_secs: Option<u32>,
    /// Whether the track contains explicit content.
    pub explicit: bool,
}

impl TrackDraft {
    /// Creates a draft with the required text fields set.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        composer: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            composer: composer.into(),
            language: language.into(),
            ..Self::default()
        }
    }

    /// Binds an audio asset.
    #[must_use]
    pub fn with_audio(mut self, audio: AssetRef) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Sets the lyricist credit.
    #[must_use]
    pub fn with_lyricist(mut self, lyricist: impl Into<String>) -> Self {
        self.lyricist = Some(lyricist.into());
        self
    }

    /// Sets the lyrics text.
    #[must_use]
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    /// Sets the preview offset.
    #[must_use]
    pub const fn with_preview_offset(mut self, seconds: u32) -> Self {
        self.preview_offset_secs = Some(seconds);
        self
    }

    /// Marks the track as explicit.
    #[must_use]
    pub const fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }
}

/// A track at a fixed position within its release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    number: TrackNumber,
    #[serde(flatten)]
    fields: TrackDraft,
}

impl Track {
    /// Reconstructs a track from persisted storage.
    #[must_use]
    pub const fn from_persisted(number: TrackNumber, fields: TrackDraft) -> Self {
        Self { number, fields }
    }

    /// Returns the track's position.
    #[must_use]
    pub const fn number(&self) -> TrackNumber {
        self.number
    }

    /// Returns the track title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.fields.title
    }

    /// Returns the composer credit.
    #[must_use]
    pub fn composer(&self) -> &str {
        &self.fields.composer
    }

    /// Returns the performance language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.fields.language
    }

    /// Returns the bound audio asset, if any.
    #[must_use]
    pub const fn audio(&self) -> Option<&AssetRef> {
        self.fields.audio.as_ref()
    }

    /// Returns all editable fields.
    #[must_use]
    pub const fn fields(&self) -> &TrackDraft {
        &self.fields
    }

    /// Checks the fields required for submission and the audio ceiling.
    ///
    /// Every problem is reported rather than the first one only.
    #[must_use]
    pub fn submission_errors(&self, config: &ReleaseConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let required = [
            (TrackField::Title, &self.fields.title),
            (TrackField::Composer, &self.fields.composer),
            (TrackField::Language, &self.fields.language),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingTrackField {
                    track_number: self.number,
                    field,
                });
            }
        }
        match &self.fields.audio {
            None => errors.push(ValidationError::MissingTrackField {
                track_number: self.number,
                field: TrackField::Audio,
            }),
            Some(audio) => {
                if let Err(err) = check_audio_size(self.number, audio, config) {
                    errors.push(err);
                }
            }
        }
        errors
    }
}

/// Direction of a single-step track move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Towards track 1.
    Up,
    /// Towards the last track.
    Down,
}

/// Ordered tracks whose numbers always form `1..=N`.
///
/// Track numbers are assigned from list positions after every mutation, so
/// gaps and duplicates cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Track>", into = "Vec<Track>")]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    /// Creates an empty track list.
    #[must_use]
    pub const fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Rebuilds a list from stored tracks, ordering by their stored numbers
    /// and closing any gaps.
    #[must_use]
    pub fn from_persisted(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by_key(Track::number);
        let mut list = Self { tracks };
        list.renumber();
        list
    }

    /// Returns the number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns whether the list holds no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Returns the tracks in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    /// Iterates over the tracks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Returns the track at a zero-based position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Returns the current track numbers in order.
    #[must_use]
    pub fn numbers(&self) -> Vec<TrackNumber> {
        self.tracks.iter().map(Track::number).collect()
    }

    /// Appends a track numbered `len + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AudioTooLarge`] when the draft's audio
    /// exceeds the configured ceiling.
    pub fn add(
        &mut self,
        draft: TrackDraft,
        config: &ReleaseConfig,
    ) -> Result<TrackNumber, ValidationError> {
        let number = TrackNumber::from_index(self.tracks.len());
        if let Some(audio) = &draft.audio {
            check_audio_size(number, audio, config)?;
        }
        self.tracks.push(Track::from_persisted(number, draft));
        Ok(number)
    }

    /// Appends several tracks, continuing from the current count.
    ///
    /// Either every draft is appended or none is.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError::AudioTooLarge`] found in the batch.
    pub fn add_many(
        &mut self,
        drafts: impl IntoIterator<Item = TrackDraft>,
        config: &ReleaseConfig,
    ) -> Result<Vec<TrackNumber>, ValidationError> {
        let mut staged = self.clone();
        let mut numbers = Vec::new();
        let mut errors = Vec::new();
        for draft in drafts {
            match staged.add(draft, config) {
                Ok(number) => numbers.push(number),
                Err(err) => errors.push(err),
            }
        }
        if let Some(err) = ValidationError::from_many(errors) {
            return Err(err);
        }
        *self = staged;
        Ok(numbers)
    }

    /// Removes the track at `index` and renumbers the tracks after it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TrackIndexOutOfRange`] for a missing
    /// position.
    pub fn remove(&mut self, index: usize) -> Result<Track, ValidationError> {
        self.ensure_index(index)?;
        let removed = self.tracks.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Swaps the track at `index` with its neighbour in `direction`.
    ///
    /// Returns the moved track's new number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TrackIndexOutOfRange`] when `index` is
    /// missing or the move would go past either end.
    pub fn move_track(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<TrackNumber, ValidationError> {
        self.ensure_index(index)?;
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => index.checked_add(1).filter(|next| *next < self.tracks.len()),
        }
        .ok_or(ValidationError::TrackIndexOutOfRange {
            index,
            len: self.tracks.len(),
        })?;
        self.tracks.swap(index, target);
        self.renumber();
        Ok(TrackNumber::from_index(target))
    }

    /// Replaces the fields of the track at `index`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TrackIndexOutOfRange`] for a missing
    /// position or [`ValidationError::AudioTooLarge`] for oversized audio.
    pub fn update(
        &mut self,
        index: usize,
        draft: TrackDraft,
        config: &ReleaseConfig,
    ) -> Result<(), ValidationError> {
        let len = self.tracks.len();
        let track = self
            .tracks
            .get_mut(index)
            .ok_or(ValidationError::TrackIndexOutOfRange { index, len })?;
        if let Some(audio) = &draft.audio {
            check_audio_size(track.number, audio, config)?;
        }
        track.fields = draft;
        Ok(())
    }

    /// Binds an audio asset to the track at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TrackIndexOutOfRange`] for a missing
    /// position or [`ValidationError::AudioTooLarge`] for oversized audio.
    pub fn attach_audio(
        &mut self,
        index: usize,
        audio: AssetRef,
        config: &ReleaseConfig,
    ) -> Result<(), ValidationError> {
        let len = self.tracks.len();
        let track = self
            .tracks
            .get_mut(index)
            .ok_or(ValidationError::TrackIndexOutOfRange { index, len })?;
        check_audio_size(track.number, &audio, config)?;
        track.fields.audio = Some(audio);
        Ok(())
    }

    fn ensure_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.tracks.len() {
            return Err(ValidationError::TrackIndexOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, track) in self.tracks.iter_mut().enumerate() {
            track.number = TrackNumber::from_index(index);
        }
    }
}

impl From<Vec<Track>> for TrackList {
    fn from(tracks: Vec<Track>) -> Self {
        Self::from_persisted(tracks)
    }
}

impl From<TrackList> for Vec<Track> {
    fn from(list: TrackList) -> Self {
        list.tracks
    }
}

impl<'a> IntoIterator for &'a TrackList {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

fn check_audio_size(
    track_number: TrackNumber,
    audio: &AssetRef,
    config: &ReleaseConfig,
) -> Result<(), ValidationError> {
    if audio.file_size() > config.max_audio_bytes {
        return Err(ValidationError::AudioTooLarge {
            track_number,
            size: audio.file_size(),
            limit: config.max_audio_bytes,
        });
    }
    Ok(())
}
