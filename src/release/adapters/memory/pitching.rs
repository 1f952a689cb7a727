//! In-memory repository for pitching submissions.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::release::InMemoryLabelState;
use crate::release::{
    domain::{Pitching, Release, ReleaseId, ReleaseStatus},
    ports::{PitchingRepository, PitchingRepositoryError, PitchingRepositoryResult},
};

/// Thread-safe in-memory pitching repository.
///
/// Obtained from
/// [`InMemoryReleaseRepository::pitching_repository`](super::InMemoryReleaseRepository::pitching_repository)
/// so that release status checks and pitching inserts share one lock.
#[derive(Debug, Clone)]
pub struct InMemoryPitchingRepository {
    state: Arc<RwLock<InMemoryLabelState>>,
}

impl InMemoryPitchingRepository {
    pub(super) const fn sharing(state: Arc<RwLock<InMemoryLabelState>>) -> Self {
        Self { state }
    }
}

fn lock_error(err: impl ToString) -> PitchingRepositoryError {
    PitchingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PitchingRepository for InMemoryPitchingRepository {
    async fn store_if_release_status(
        &self,
        pitching: &Pitching,
        expected: ReleaseStatus,
    ) -> PitchingRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let release_id = pitching.release_id();
        let actual = state
            .releases
            .get(&release_id)
            .map(Release::status)
            .ok_or(PitchingRepositoryError::ReleaseNotFound(release_id))?;
        if actual != expected {
            return Err(PitchingRepositoryError::ReleaseStatusMismatch {
                release_id,
                expected,
                actual,
            });
        }
        let duplicate = state
            .pitchings
            .values()
            .flatten()
            .any(|existing| existing.id() == pitching.id());
        if duplicate {
            return Err(PitchingRepositoryError::DuplicatePitching(pitching.id()));
        }
        state
            .pitchings
            .entry(release_id)
            .or_default()
            .push(pitching.clone());
        Ok(())
    }

    async fn find_by_release(
        &self,
        release_id: ReleaseId,
    ) -> PitchingRepositoryResult<Vec<Pitching>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.pitchings.get(&release_id).cloned().unwrap_or_default())
    }
}
