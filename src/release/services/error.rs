//! Service-level errors shared by the release services.

use crate::release::{
    domain::{ReleaseDomainError, ReleaseId},
    ports::{PitchingRepositoryError, ReleaseRepositoryError},
};
use thiserror::Error;

/// Errors returned by release lifecycle, track, and pitching services.
#[derive(Debug, Error)]
pub enum ReleaseServiceError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] ReleaseDomainError),

    /// Release persistence failed.
    #[error(transparent)]
    Repository(#[from] ReleaseRepositoryError),

    /// Pitching persistence failed.
    #[error(transparent)]
    PitchingRepository(#[from] PitchingRepositoryError),

    /// No release exists with the requested identifier.
    #[error("release not found: {0}")]
    NotFound(ReleaseId),
}

/// Result type for release service operations.
pub type ReleaseServiceResult<T> = Result<T, ReleaseServiceError>;

/// Closed error category for building user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input must be corrected.
    Validation,
    /// The release is not in a status that allows the operation.
    InvalidTransition,
    /// A cross-entity gate failed.
    Precondition,
    /// The release does not exist.
    NotFound,
    /// The caller lacks the role or ownership required.
    Forbidden,
    /// Storage or another collaborator failed.
    Infrastructure,
}

impl ReleaseServiceError {
    /// Returns the category of this error.
    ///
    /// A lost compare-and-set race is reported as
    /// [`ErrorKind::InvalidTransition`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ReleaseDomainError::Validation(_)) => ErrorKind::Validation,
            Self::Domain(ReleaseDomainError::InvalidTransition { .. })
            | Self::Repository(
                ReleaseRepositoryError::StatusConflict { .. }
                | ReleaseRepositoryError::RevisionConflict { .. },
            ) => {
                ErrorKind::InvalidTransition
            }
            Self::Domain(ReleaseDomainError::Precondition(_)) => ErrorKind::Precondition,
            Self::Domain(ReleaseDomainError::Forbidden { .. }) => ErrorKind::Forbidden,
            Self::NotFound(_) | Self::Repository(ReleaseRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Repository(
                ReleaseRepositoryError::DuplicateRelease(_) | ReleaseRepositoryError::Persistence(_),
            )
            | Self::PitchingRepository(_) => ErrorKind::Infrastructure,
        }
    }
}
