//! Repository port for release persistence and guarded status updates.

use crate::release::domain::{Release, ReleaseId, ReleaseStatus, ReleaseVersion, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for release repository operations.
pub type ReleaseRepositoryResult<T> = Result<T, ReleaseRepositoryError>;

/// Release persistence contract.
///
/// Tracks are stored with their release and written in the same unit as the
/// release row, so readers never observe partially renumbered track lists.
#[async_trait]
pub trait ReleaseRepository: Send + Sync {
    /// Stores a new release with its tracks.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseRepositoryError::DuplicateRelease`] when the release
    /// ID already exists.
    async fn store(&self, release: &Release) -> ReleaseRepositoryResult<()>;

    /// Replaces a stored release only if its status and revision still equal
    /// `expected`.
    ///
    /// This is the compare-and-set every lifecycle transition and edit goes
    /// through. Two writers that read the same revision cannot both commit.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseRepositoryError::NotFound`] when the release does not
    /// exist, [`ReleaseRepositoryError::StatusConflict`] when another writer
    /// changed the status first, or
    /// [`ReleaseRepositoryError::RevisionConflict`] when another writer
    /// committed a change in the same status.
    async fn update_if_current(
        &self,
        release: &Release,
        expected: ReleaseVersion,
    ) -> ReleaseRepositoryResult<()>;

    /// Finds a release by identifier.
    ///
    /// Returns `None` when the release does not exist.
    async fn find_by_id(&self, id: ReleaseId) -> ReleaseRepositoryResult<Option<Release>>;

    /// Returns every release owned by `owner_id`, newest first.
    async fn find_by_owner(&self, owner_id: UserId) -> ReleaseRepositoryResult<Vec<Release>>;

    /// Returns every release in `status`, oldest first.
    async fn find_by_status(&self, status: ReleaseStatus) -> ReleaseRepositoryResult<Vec<Release>>;

    /// Deletes a release with its tracks and pitchings if its status still
    /// equals `expected`.
    ///
    /// The release and everything attached to it go in one unit; a failure
    /// leaves all of them in place.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseRepositoryError::NotFound`] when the release does not
    /// exist or [`ReleaseRepositoryError::StatusConflict`] when another
    /// writer changed the status first.
    async fn delete_if_status(
        &self,
        id: ReleaseId,
        expected: ReleaseStatus,
    ) -> ReleaseRepositoryResult<()>;
}

/// Errors returned by release repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReleaseRepositoryError {
    /// A release with the same identifier already exists.
    #[error("duplicate release identifier: {0}")]
    DuplicateRelease(ReleaseId),

    /// The release was not found.
    #[error("release not found: {0}")]
    NotFound(ReleaseId),

    /// The stored status no longer matches the status the write was based on.
    #[error("release {id} status changed concurrently: expected {expected}, found {actual}")]
    StatusConflict {
        /// Release being written.
        id: ReleaseId,
        /// Status the caller read.
        expected: ReleaseStatus,
        /// Status currently stored.
        actual: ReleaseStatus,
    },

    /// Another write committed since the release was read.
    #[error("release {id} was modified concurrently: expected revision {expected}, found {actual}")]
    RevisionConflict {
        /// Release being written.
        id: ReleaseId,
        /// Revision the caller read.
        expected: u64,
        /// Revision currently stored.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReleaseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for ReleaseRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
