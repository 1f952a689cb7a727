//! Shared world state for release moderation BDD scenarios.

use std::sync::Arc;

use labeldesk::release::{
    adapters::memory::{
        InMemoryAssetUploader, InMemoryPitchingRepository, InMemoryReleaseRepository,
        RecordingNotifier,
    },
    domain::{Actor, Release, ReleaseId},
    services::{
        ErrorKind, PitchingService, ReleaseLifecycleService, ReleaseServiceError,
        TrackOrderingService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = ReleaseLifecycleService<
    InMemoryReleaseRepository,
    InMemoryAssetUploader,
    RecordingNotifier,
    DefaultClock,
>;

/// Pitching service type used by the BDD world.
pub type TestPitching = PitchingService<
    InMemoryReleaseRepository,
    InMemoryPitchingRepository,
    InMemoryAssetUploader,
    RecordingNotifier,
    DefaultClock,
>;

/// Track service type used by the BDD world.
pub type TestTracks =
    TrackOrderingService<InMemoryReleaseRepository, InMemoryAssetUploader, DefaultClock>;

/// Scenario world for release moderation behaviour tests.
pub struct ModerationWorld {
    pub lifecycle: TestLifecycle,
    pub pitching: TestPitching,
    pub tracks: TestTracks,
    pub artist: Actor,
    pub manager: Actor,
    pub release_id: Option<ReleaseId>,
    pub last_error: Option<ErrorKind>,
}

impl ModerationWorld {
    /// Creates a world with fresh in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let releases = Arc::new(InMemoryReleaseRepository::new());
        let pitchings = Arc::new(releases.pitching_repository());
        let uploader = Arc::new(InMemoryAssetUploader::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(DefaultClock);

        Self {
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
                notifier,
                Arc::clone(&clock),
            ),
            tracks: TrackOrderingService::new(releases, uploader, clock),
            artist: Actor::artist("Ari Vale"),
            manager: Actor::manager("Mo Reyes"),
            release_id: None,
            last_error: None,
        }
    }

    /// Returns the release under test.
    ///
    /// # Errors
    ///
    /// Returns an error if no release has been created yet.
    pub fn release_id(&self) -> eyre::Result<ReleaseId> {
        self.release_id
            .ok_or_else(|| eyre::eyre!("missing release in scenario world"))
    }

    /// Loads the current state of the release under test.
    ///
    /// # Errors
    ///
    /// Returns an error if the release is missing or the lookup fails.
    pub fn current_release(&self) -> eyre::Result<Release> {
        let id = self.release_id()?;
        run_async(self.lifecycle.find_by_id(id))?
            .ok_or_else(|| eyre::eyre!("release {id} not found"))
    }

    /// Remembers the error category of a failed operation.
    pub fn record<T>(&mut self, result: Result<T, ReleaseServiceError>) {
        self.last_error = result.err().as_ref().map(ReleaseServiceError::kind);
    }
}

impl Default for ModerationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ModerationWorld {
    ModerationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
