//! In-memory integration tests for races and failing collaborators.

use super::helpers::{Label, label, populated_track, submittable_details};
use labeldesk::release::{
    domain::{AssetSlot, AssetUpload, ReleaseStatus, ReviewVerdict, ValidationError},
    services::{ErrorKind, ReleaseServiceError, ReleaseSubmission, ReviewRequest, TrackSubmission},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reviews_record_one_decision(label: Label) -> eyre::Result<()> {
    let release = label
        .lifecycle
        .submit_new(
            &label.artist,
            ReleaseSubmission::new(submittable_details("Tidal Glass")?)
                .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?)),
        )
        .await?;
    let id = release.id();

    let approve = {
        let service = label.lifecycle.clone();
        let reviewer = label.manager.clone();
        tokio::spawn(async move {
            service
                .review(&reviewer, ReviewRequest::new(id, ReviewVerdict::Approved, ""))
                .await
        })
    };
    let reject = {
        let service = label.lifecycle.clone();
        let reviewer = label.director.clone();
        tokio::spawn(async move {
            service
                .review(
                    &reviewer,
                    ReviewRequest::new(id, ReviewVerdict::RejectedFinal, "duplicate upload"),
                )
                .await
        })
    };
    let outcomes = [approve.await?, reject.await?];

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    eyre::ensure!(winners == 1, "exactly one review should win, got {outcomes:?}");
    let loser_kind = outcomes
        .iter()
        .find_map(|outcome| outcome.as_ref().err().map(ReleaseServiceError::kind));
    eyre::ensure!(
        loser_kind == Some(ErrorKind::InvalidTransition),
        "loser should see an invalid transition, got {loser_kind:?}"
    );
    let stored = label
        .lifecycle
        .find_by_id(id)
        .await?
        .ok_or_else(|| eyre::eyre!("release should exist"))?;
    eyre::ensure!(
        stored.status() != ReleaseStatus::Pending,
        "a decision should be stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_notifier_does_not_undo_transition(label: Label) -> eyre::Result<()> {
    label.notifier.set_failing(true);

    let release = label
        .lifecycle
        .submit_new(
            &label.artist,
            ReleaseSubmission::new(submittable_details("Tidal Glass")?)
                .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?)),
        )
        .await?;

    let stored = label
        .lifecycle
        .find_by_id(release.id())
        .await?
        .ok_or_else(|| eyre::eyre!("release should exist"))?;
    eyre::ensure!(stored.status() == ReleaseStatus::Pending, "should be pending");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_cover_upload_is_reported_and_nothing_stored(label: Label) -> eyre::Result<()> {
    label.uploader.fail_for("broken.png")?;
    let mut details = submittable_details("Tidal Glass")?;
    details.cover = None;
    let submission = ReleaseSubmission::new(details)
        .with_cover(AssetUpload::new("broken.png", vec![0_u8; 8]))
        .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?));

    let result = label.lifecycle.submit_new(&label.artist, submission).await;

    let Err(ReleaseServiceError::Domain(err)) = result else {
        eyre::bail!("expected an upload failure, got {result:?}");
    };
    eyre::ensure!(
        matches!(
            err,
            labeldesk::release::domain::ReleaseDomainError::Validation(
                ValidationError::AssetUpload {
                    slot: AssetSlot::Cover,
                    ..
                }
            )
        ),
        "failure should name the cover, got {err:?}"
    );
    eyre::ensure!(
        label.lifecycle.list_by_owner(label.artist.id()).await?.is_empty(),
        "nothing should be stored"
    );
    Ok(())
}
