//! In-memory adapters for the release lifecycle.

mod notifier;
mod pitching;
mod release;
mod upload;

pub use notifier::RecordingNotifier;
pub use pitching::InMemoryPitchingRepository;
pub use release::InMemoryReleaseRepository;
pub use upload::InMemoryAssetUploader;
