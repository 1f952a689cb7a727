//! In-memory integration tests for the moderation lifecycle.

use super::helpers::{Label, label, populated_track, submittable_details};
use labeldesk::release::{
    domain::{
        AssetUpload, ReleaseDetails, ReleaseDomainError, ReleaseEvent, ReleaseStatus,
        ReviewVerdict, ValidationError,
    },
    services::{
        ErrorKind, ReleaseServiceError, ReleaseSubmission, ReviewRequest, TrackSubmission,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_release_enters_moderation(label: Label) -> eyre::Result<()> {
    let submission = ReleaseSubmission::new(submittable_details("Tidal Glass")?)
        .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?));

    let release = label.lifecycle.submit_new(&label.artist, submission).await?;

    eyre::ensure!(release.status() == ReleaseStatus::Pending, "should be pending");
    let queue = label.lifecycle.list_by_status(ReleaseStatus::Pending).await?;
    eyre::ensure!(queue == vec![release], "release should be queued for moderation");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fixable_rejection_round_trip(label: Label) -> eyre::Result<()> {
    let draft = label
        .lifecycle
        .create_draft(&label.artist, submittable_details("Tidal Glass")?)
        .await?;
    label
        .tracks
        .add_track(&label.artist, draft.id(), populated_track("Low Tide")?)
        .await?;
    label.lifecycle.submit(&label.artist, draft.id()).await?;

    let rejected = label
        .lifecycle
        .review(
            &label.manager,
            ReviewRequest::new(draft.id(), ReviewVerdict::RejectedFixable, "fix the cover"),
        )
        .await?;
    eyre::ensure!(
        rejected.status() == ReleaseStatus::RejectedFixable,
        "should be rejected_fixable"
    );
    eyre::ensure!(
        rejected.review().map(|record| record.comment.as_str()) == Some("fix the cover"),
        "comment should be stored"
    );

    let resubmitted = label.lifecycle.resubmit(&label.artist, draft.id()).await?;
    eyre::ensure!(
        resubmitted.status() == ReleaseStatus::Pending,
        "should be pending again"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_hears_about_every_decision(label: Label) -> eyre::Result<()> {
    let release = label
        .lifecycle
        .submit_new(
            &label.artist,
            ReleaseSubmission::new(submittable_details("Tidal Glass")?)
                .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?)),
        )
        .await?;
    label
        .lifecycle
        .review(
            &label.director,
            ReviewRequest::new(release.id(), ReviewVerdict::Approved, ""),
        )
        .await?;

    let to_owner: Vec<ReleaseEvent> = label
        .notifier
        .sent()?
        .into_iter()
        .filter(|notification| {
            notification.recipients
                == labeldesk::release::domain::Recipients::User(label.artist.id())
        })
        .map(|notification| notification.event)
        .collect();
    eyre::ensure!(
        matches!(
            to_owner.as_slice(),
            [ReleaseEvent::StatusChanged {
                to: ReleaseStatus::Approved,
                ..
            }]
        ),
        "unexpected owner notifications {to_owner:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn incomplete_release_lists_every_gap(label: Label) -> eyre::Result<()> {
    let submission = ReleaseSubmission::new(ReleaseDetails::named("Bare"))
        .with_track(TrackSubmission::without_audio(
            labeldesk::release::domain::TrackDraft::new("Untitled", "", "en"),
        ));

    let result = label.lifecycle.submit_new(&label.artist, submission).await;

    let Err(ReleaseServiceError::Domain(ReleaseDomainError::Validation(err))) = result else {
        eyre::bail!("expected validation failure, got {result:?}");
    };
    let gaps = err.flatten();
    eyre::ensure!(gaps.len() >= 3, "expected several gaps, got {gaps:?}");
    eyre::ensure!(
        gaps.iter()
            .any(|gap| matches!(gap, ValidationError::MissingCover)),
        "missing cover should be reported"
    );
    eyre::ensure!(
        label.lifecycle.list_by_owner(label.artist.id()).await?.is_empty(),
        "nothing should be stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_uploads_are_bound_before_submission(label: Label) -> eyre::Result<()> {
    let mut details = submittable_details("Tidal Glass")?;
    details.cover = None;
    let mut first = populated_track("Low Tide")?;
    first.audio = None;
    let submission = ReleaseSubmission::new(details)
        .with_cover(AssetUpload::new("cover.png", vec![3_u8; 64]))
        .with_track(TrackSubmission::new(
            first,
            AssetUpload::new("low-tide.wav", vec![5_u8; 128]),
        ));

    let release = label.lifecycle.submit_new(&label.artist, submission).await?;

    eyre::ensure!(release.details().cover.is_some(), "cover should be bound");
    let audio = release
        .tracks()
        .as_slice()
        .first()
        .and_then(|track| track.audio())
        .ok_or_else(|| eyre::eyre!("audio should be bound"))?;
    eyre::ensure!(audio.file_size() == 128, "unexpected size {}", audio.file_size());
    eyre::ensure!(label.uploader.uploaded()?.len() == 2, "two uploads expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewers_cannot_author_releases(label: Label) -> eyre::Result<()> {
    let result = label
        .lifecycle
        .create_draft(&label.manager, submittable_details("Not Mine")?)
        .await;

    let Err(err) = result else {
        eyre::bail!("managers cannot create releases");
    };
    eyre::ensure!(err.kind() == ErrorKind::Forbidden, "unexpected {err:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn final_rejection_can_be_deleted_by_owner(label: Label) -> eyre::Result<()> {
    let release = label
        .lifecycle
        .submit_new(
            &label.artist,
            ReleaseSubmission::new(submittable_details("Tidal Glass")?)
                .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?)),
        )
        .await?;
    label
        .lifecycle
        .review(
            &label.manager,
            ReviewRequest::new(release.id(), ReviewVerdict::RejectedFinal, "sample not cleared"),
        )
        .await?;

    let stranger = labeldesk::release::domain::Actor::artist("Someone Else");
    let denied = label.lifecycle.delete(&stranger, release.id()).await;
    eyre::ensure!(
        denied.as_ref().map_err(ReleaseServiceError::kind) == Err(ErrorKind::Forbidden),
        "only the owner may delete, got {denied:?}"
    );

    label.lifecycle.delete(&label.artist, release.id()).await?;
    eyre::ensure!(
        label.lifecycle.find_by_id(release.id()).await?.is_none(),
        "release should be gone"
    );
    Ok(())
}
