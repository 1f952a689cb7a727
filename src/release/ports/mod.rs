//! Port contracts for the release lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by release services.

pub mod notification;
pub mod pitching;
pub mod repository;
pub mod upload;

pub use notification::{NotificationError, NotificationResult, Notifier};
pub use pitching::{PitchingRepository, PitchingRepositoryError, PitchingRepositoryResult};
pub use repository::{ReleaseRepository, ReleaseRepositoryError, ReleaseRepositoryResult};
pub use upload::{AssetUploadError, AssetUploadResult, AssetUploader};
