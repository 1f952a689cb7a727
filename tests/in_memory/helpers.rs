//! Shared helpers for in-memory release integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use labeldesk::release::{
    adapters::memory::{
        InMemoryAssetUploader, InMemoryPitchingRepository, InMemoryReleaseRepository,
        RecordingNotifier,
    },
    domain::{Actor, AssetRef, PitchingDraft, ReleaseDetails, TrackDraft},
    services::{PitchingService, ReleaseLifecycleService, TrackOrderingService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Lifecycle service wired to in-memory adapters.
pub type TestLifecycle = ReleaseLifecycleService<
    InMemoryReleaseRepository,
    InMemoryAssetUploader,
    RecordingNotifier,
    DefaultClock,
>;

/// Pitching service wired to in-memory adapters.
pub type TestPitching = PitchingService<
    InMemoryReleaseRepository,
    InMemoryPitchingRepository,
    InMemoryAssetUploader,
    RecordingNotifier,
    DefaultClock,
>;

/// Track service wired to in-memory adapters.
pub type TestTracks =
    TrackOrderingService<InMemoryReleaseRepository, InMemoryAssetUploader, DefaultClock>;

/// All services sharing one set of adapters.
pub struct Label {
    pub lifecycle: TestLifecycle,
    pub pitching: TestPitching,
    pub tracks: TestTracks,
    pub uploader: Arc<InMemoryAssetUploader>,
    pub notifier: Arc<RecordingNotifier>,
    pub artist: Actor,
    pub manager: Actor,
    pub director: Actor,
}

/// Provides services over fresh in-memory adapters.
#[fixture]
pub fn label() -> Label {
    let releases = Arc::new(InMemoryReleaseRepository::new());
    let pitchings = Arc::new(releases.pitching_repository());
    let uploader = Arc::new(InMemoryAssetUploader::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(DefaultClock);

    Label {
        lifecycle: ReleaseLifecycleService::new(
            Arc::clone(&releases),
            Arc::clone(&uploader),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ),
        pitching: PitchingService::new(
            Arc::clone(&releases),
            pitchings,
            Arc::clone(&uploader),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ),
        tracks: TrackOrderingService::new(releases, Arc::clone(&uploader), clock),
        uploader,
        notifier,
        artist: Actor::artist("Ari Vale"),
        manager: Actor::manager("Mo Reyes"),
        director: Actor::director("Dee Park"),
    }
}

/// Builds an asset hosted on the test CDN.
///
/// # Errors
///
/// Returns an error if the generated URL is rejected.
pub fn cdn_asset(file_name: &str, file_size: u64) -> eyre::Result<AssetRef> {
    Ok(AssetRef::parse(
        &format!("https://cdn.example.com/{file_name}"),
        file_name,
        file_size,
    )?)
}

/// Release metadata ready for submission.
///
/// # Errors
///
/// Returns an error if the fixture date or cover is invalid.
pub fn submittable_details(name: &str) -> eyre::Result<ReleaseDetails> {
    let date = NaiveDate::from_ymd_opt(2026, 12, 4)
        .ok_or_else(|| eyre::eyre!("invalid fixture date"))?;
    Ok(ReleaseDetails::named(name)
        .with_cover(cdn_asset("cover.png", 2_048)?)
        .with_release_date(date)
        .with_genre("ambient"))
}

/// A fully populated track.
///
/// # Errors
///
/// Returns an error if the audio asset is invalid.
pub fn populated_track(title: &str) -> eyre::Result<TrackDraft> {
    Ok(TrackDraft::new(title, "L. Writer", "en")
        .with_audio(cdn_asset(&format!("{title}.flac"), 4_096)?))
}

/// A valid pitching payload with `photos` photos.
///
/// # Errors
///
/// Returns an error if a photo asset is invalid.
pub fn pitch(photos: usize) -> eyre::Result<PitchingDraft> {
    Ok(PitchingDraft {
        artist_description: "Ambient producer from Lisbon".to_owned(),
        release_description: "Slow-moving textures for early mornings".to_owned(),
        playlist_fit: "Deep focus".to_owned(),
        current_reach: "4k followers".to_owned(),
        preview_link: "https://preview.example.com/tidal-glass".to_owned(),
        photos: (0..photos)
            .map(|n| cdn_asset(&format!("press-{n}.jpg"), 900))
            .collect::<eyre::Result<_>>()?,
    })
}

/// Returns track titles prefixed with their numbers, e.g. `1:intro`.
#[must_use]
pub fn numbered_titles(release: &labeldesk::release::domain::Release) -> Vec<String> {
    release
        .tracks()
        .iter()
        .map(|track| format!("{}:{}", track.number(), track.title()))
        .collect()
}
