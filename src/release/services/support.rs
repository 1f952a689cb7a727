//! Helpers shared by the release services.

use super::error::{ReleaseServiceError, ReleaseServiceResult};
use crate::release::{
    domain::{
        AssetRef, AssetSlot, AssetUpload, LifecycleEvent, Notification, Release,
        ReleaseDomainError, ReleaseId, ReleaseStatus, ReleaseVersion, ValidationError,
    },
    ports::{AssetUploader, Notifier, ReleaseRepository, ReleaseRepositoryError},
};
use futures::future::join_all;
use tracing::{debug, warn};

/// Loads a release or reports it missing.
pub(super) async fn load_release<R>(repository: &R, id: ReleaseId) -> ReleaseServiceResult<Release>
where
    R: ReleaseRepository + ?Sized,
{
    repository
        .find_by_id(id)
        .await?
        .ok_or(ReleaseServiceError::NotFound(id))
}

/// Writes `release` if the stored copy is still at the `expected` version.
///
/// A lost race on the status surfaces as an invalid transition from the
/// status the winner committed. A lost race between two edits in the same
/// status surfaces as a revision conflict.
pub(super) async fn commit<R>(
    repository: &R,
    release: &Release,
    expected: ReleaseVersion,
    event: LifecycleEvent,
) -> ReleaseServiceResult<()>
where
    R: ReleaseRepository + ?Sized,
{
    repository
        .update_if_current(release, expected)
        .await
        .map_err(|err| guard_failure(err, event))
}

/// Deletes the release if the stored status is still `expected`.
pub(super) async fn remove<R>(
    repository: &R,
    id: ReleaseId,
    expected: ReleaseStatus,
) -> ReleaseServiceResult<()>
where
    R: ReleaseRepository + ?Sized,
{
    repository
        .delete_if_status(id, expected)
        .await
        .map_err(|err| guard_failure(err, LifecycleEvent::Delete))
}

fn guard_failure(err: ReleaseRepositoryError, event: LifecycleEvent) -> ReleaseServiceError {
    match err {
        ReleaseRepositoryError::StatusConflict {
            id,
            expected,
            actual,
        } => {
            warn!(
                release_id = %id,
                expected = %expected,
                actual = %actual,
                event = %event,
                "lost concurrent status update"
            );
            ReleaseDomainError::InvalidTransition {
                release_id: id,
                from: actual,
                event,
            }
            .into()
        }
        ReleaseRepositoryError::RevisionConflict {
            id,
            expected,
            actual,
        } => {
            warn!(
                release_id = %id,
                expected,
                actual,
                event = %event,
                "lost concurrent edit"
            );
            ReleaseRepositoryError::RevisionConflict {
                id,
                expected,
                actual,
            }
            .into()
        }
        ReleaseRepositoryError::NotFound(id) => ReleaseServiceError::NotFound(id),
        other => other.into(),
    }
}

/// Sends a notification, logging instead of failing on delivery errors.
pub(super) async fn deliver<N>(notifier: &N, notification: Notification)
where
    N: Notifier + ?Sized,
{
    if let Err(err) = notifier.notify(&notification).await {
        warn!(error = %err, event = ?notification.event, "notification delivery failed");
    }
}

/// Uploads every asset in parallel.
///
/// Either every upload succeeds or the failures are returned together, each
/// attributed to its slot.
pub(super) async fn upload_all<U>(
    uploader: &U,
    uploads: Vec<(AssetSlot, AssetUpload)>,
) -> Result<Vec<(AssetSlot, AssetRef)>, ValidationError>
where
    U: AssetUploader + ?Sized,
{
    let pending = uploads.into_iter().map(|(slot, upload)| async move {
        debug!(slot = %slot, file_name = %upload.file_name, "uploading asset");
        let result = uploader.upload(upload).await;
        (slot, result)
    });

    let mut uploaded = Vec::new();
    let mut failures = Vec::new();
    for (slot, result) in join_all(pending).await {
        match result {
            Ok(asset) => uploaded.push((slot, asset)),
            Err(err) => failures.push(ValidationError::AssetUpload {
                slot,
                reason: err.to_string(),
            }),
        }
    }

    match ValidationError::from_many(failures) {
        Some(err) => Err(err),
        None => Ok(uploaded),
    }
}

/// Uploads a single asset for `slot`.
pub(super) async fn upload_one<U>(
    uploader: &U,
    slot: AssetSlot,
    upload: AssetUpload,
) -> Result<AssetRef, ValidationError>
where
    U: AssetUploader + ?Sized,
{
    debug!(slot = %slot, file_name = %upload.file_name, "uploading asset");
    uploader
        .upload(upload)
        .await
        .map_err(|err| ValidationError::AssetUpload {
            slot,
            reason: err.to_string(),
        })
}
