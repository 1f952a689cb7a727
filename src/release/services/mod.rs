//! Application services for the release lifecycle.

mod error;
mod lifecycle;
mod pitching;
mod support;
mod tracks;

pub use error::{ErrorKind, ReleaseServiceError, ReleaseServiceResult};
pub use lifecycle::{ReleaseLifecycleService, ReleaseSubmission, ReviewRequest, TrackSubmission};
pub use pitching::PitchingService;
pub use tracks::TrackOrderingService;
