//! In-memory repository for release lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::pitching::InMemoryPitchingRepository;
use crate::release::{
    domain::{Pitching, Release, ReleaseId, ReleaseStatus, ReleaseVersion, UserId},
    ports::{ReleaseRepository, ReleaseRepositoryError, ReleaseRepositoryResult},
};

/// Thread-safe in-memory release repository.
///
/// Each write holds the lock for its whole compare-and-set, which gives the
/// same atomicity as a conditional `UPDATE` in a database. Pitchings live
/// behind the same lock; see [`Self::pitching_repository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryReleaseRepository {
    state: Arc<RwLock<InMemoryLabelState>>,
}

/// Releases and pitchings guarded by one lock.
#[derive(Debug, Default)]
pub(super) struct InMemoryLabelState {
    pub(super) releases: HashMap<ReleaseId, Release>,
    pub(super) owner_index: HashMap<UserId, Vec<ReleaseId>>,
    pub(super) pitchings: HashMap<ReleaseId, Vec<Pitching>>,
}

impl InMemoryReleaseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a pitching repository sharing this repository's storage.
    ///
    /// Pitching inserts check the release status and deletes cascade to
    /// pitchings under a single lock.
    #[must_use]
    pub fn pitching_repository(&self) -> InMemoryPitchingRepository {
        InMemoryPitchingRepository::sharing(Arc::clone(&self.state))
    }

    fn read(&self) -> ReleaseRepositoryResult<RwLockReadGuard<'_, InMemoryLabelState>> {
        self.state.read().map_err(|err| {
            ReleaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ReleaseRepositoryResult<RwLockWriteGuard<'_, InMemoryLabelState>> {
        self.state.write().map_err(|err| {
            ReleaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn stored(state: &InMemoryLabelState, id: ReleaseId) -> ReleaseRepositoryResult<&Release> {
    state
        .releases
        .get(&id)
        .ok_or(ReleaseRepositoryError::NotFound(id))
}

/// Fails unless the stored release exists and is still in `expected`.
fn check_status(
    state: &InMemoryLabelState,
    id: ReleaseId,
    expected: ReleaseStatus,
) -> ReleaseRepositoryResult<()> {
    let current = stored(state, id)?;
    if current.status() != expected {
        return Err(ReleaseRepositoryError::StatusConflict {
            id,
            expected,
            actual: current.status(),
        });
    }
    Ok(())
}

/// Fails unless the stored release still has the status and revision read.
fn check_version(
    state: &InMemoryLabelState,
    id: ReleaseId,
    expected: ReleaseVersion,
) -> ReleaseRepositoryResult<()> {
    check_status(state, id, expected.status)?;
    let actual = stored(state, id)?.revision();
    if actual != expected.revision {
        return Err(ReleaseRepositoryError::RevisionConflict {
            id,
            expected: expected.revision,
            actual,
        });
    }
    Ok(())
}

fn collect_sorted<'a>(
    releases: impl Iterator<Item = &'a Release>,
    newest_first: bool,
) -> Vec<Release> {
    let mut found: Vec<Release> = releases.cloned().collect();
    found.sort_by_key(Release::created_at);
    if newest_first {
        found.reverse();
    }
    found
}

#[async_trait]
impl ReleaseRepository for InMemoryReleaseRepository {
    async fn store(&self, release: &Release) -> ReleaseRepositoryResult<()> {
        let mut state = self.write()?;
        if state.releases.contains_key(&release.id()) {
            return Err(ReleaseRepositoryError::DuplicateRelease(release.id()));
        }
        state
            .owner_index
            .entry(release.owner_id())
            .or_default()
            .push(release.id());
        state.releases.insert(release.id(), release.clone());
        Ok(())
    }

    async fn update_if_current(
        &self,
        release: &Release,
        expected: ReleaseVersion,
    ) -> ReleaseRepositoryResult<()> {
        let mut state = self.write()?;
        check_version(&state, release.id(), expected)?;
        state.releases.insert(release.id(), release.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ReleaseId) -> ReleaseRepositoryResult<Option<Release>> {
        let state = self.read()?;
        Ok(state.releases.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> ReleaseRepositoryResult<Vec<Release>> {
        let state = self.read()?;
        let owned = state
            .owner_index
            .get(&owner_id)
            .map(|ids| {
                collect_sorted(ids.iter().filter_map(|id| state.releases.get(id)), true)
            })
            .unwrap_or_default();
        Ok(owned)
    }

    async fn find_by_status(&self, status: ReleaseStatus) -> ReleaseRepositoryResult<Vec<Release>> {
        let state = self.read()?;
        Ok(collect_sorted(
            state
                .releases
                .values()
                .filter(|release| release.status() == status),
            false,
        ))
    }

    async fn delete_if_status(
        &self,
        id: ReleaseId,
        expected: ReleaseStatus,
    ) -> ReleaseRepositoryResult<()> {
        let mut state = self.write()?;
        check_status(&state, id, expected)?;
        let Some(removed) = state.releases.remove(&id) else {
            return Ok(());
        };
        state.pitchings.remove(&id);
        let owner_id = removed.owner_id();
        if let Some(ids) = state.owner_index.get_mut(&owner_id) {
            ids.retain(|owned| *owned != id);
            if ids.is_empty() {
                state.owner_index.remove(&owner_id);
            }
        }
        Ok(())
    }
}
