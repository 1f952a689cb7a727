//! Repository port for pitching submissions.

use crate::release::domain::{Pitching, PitchingId, ReleaseId, ReleaseStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for pitching repository operations.
pub type PitchingRepositoryResult<T> = Result<T, PitchingRepositoryError>;

/// Pitching persistence contract.
///
/// Several pitchings may exist per release; the store does not enforce
/// uniqueness. Pitchings are removed together with their release by
/// [`super::ReleaseRepository::delete_if_status`].
#[async_trait]
pub trait PitchingRepository: Send + Sync {
    /// Stores a new pitching if its release is still in `expected`.
    ///
    /// The status check and the insert form one unit, so a release that
    /// leaves `expected` concurrently never gains a pitching.
    ///
    /// # Errors
    ///
    /// Returns [`PitchingRepositoryError::ReleaseNotFound`] when the release
    /// does not exist, [`PitchingRepositoryError::ReleaseStatusMismatch`]
    /// when it is in another status, or
    /// [`PitchingRepositoryError::DuplicatePitching`] when the pitching ID
    /// already exists.
    async fn store_if_release_status(
        &self,
        pitching: &Pitching,
        expected: ReleaseStatus,
    ) -> PitchingRepositoryResult<()>;

    /// Returns every pitching for a release, oldest first.
    async fn find_by_release(
        &self,
        release_id: ReleaseId,
    ) -> PitchingRepositoryResult<Vec<Pitching>>;
}

/// Errors returned by pitching repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PitchingRepositoryError {
    /// A pitching with the same identifier already exists.
    #[error("duplicate pitching identifier: {0}")]
    DuplicatePitching(PitchingId),

    /// The release the pitching belongs to does not exist.
    #[error("release not found: {0}")]
    ReleaseNotFound(ReleaseId),

    /// The release is not in the status the pitching requires.
    #[error("release {release_id} is {actual}, expected {expected}")]
    ReleaseStatusMismatch {
        /// Release the pitching belongs to.
        release_id: ReleaseId,
        /// Status the pitching requires.
        expected: ReleaseStatus,
        /// Status currently stored.
        actual: ReleaseStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PitchingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for PitchingRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
