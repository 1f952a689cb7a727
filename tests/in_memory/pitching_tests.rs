//! In-memory integration tests for pitching approved releases.

use super::helpers::{Label, label, pitch, populated_track, submittable_details};
use labeldesk::release::{
    domain::{ReleaseId, ReviewVerdict},
    services::{ErrorKind, ReleaseSubmission, ReviewRequest, TrackSubmission},
};
use rstest::rstest;

async fn submitted(label: &Label) -> eyre::Result<ReleaseId> {
    let release = label
        .lifecycle
        .submit_new(
            &label.artist,
            ReleaseSubmission::new(submittable_details("Tidal Glass")?)
                .with_track(TrackSubmission::without_audio(populated_track("Low Tide")?)),
        )
        .await?;
    Ok(release.id())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_release_can_be_pitched_twice(label: Label) -> eyre::Result<()> {
    let id = submitted(&label).await?;
    label
        .lifecycle
        .review(&label.manager, ReviewRequest::new(id, ReviewVerdict::Approved, ""))
        .await?;

    let first = label.pitching.submit_pitching(&label.artist, id, pitch(5)?).await?;
    let second = label.pitching.submit_pitching(&label.artist, id, pitch(2)?).await?;

    eyre::ensure!(first.id() != second.id(), "pitchings should be distinct");
    eyre::ensure!(
        label.pitching.list_pitchings(id).await?.len() == 2,
        "both pitchings should be kept"
    );
    eyre::ensure!(
        label.pitching.latest_pitching(id).await?.map(|latest| latest.id()) == Some(second.id()),
        "latest pitching should be the second"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_release_cannot_be_pitched(label: Label) -> eyre::Result<()> {
    let id = submitted(&label).await?;

    let result = label.pitching.submit_pitching(&label.artist, id, pitch(1)?).await;

    let Err(err) = result else {
        eyre::bail!("pending releases cannot be pitched");
    };
    eyre::ensure!(err.kind() == ErrorKind::Precondition, "unexpected {err:?}");
    eyre::ensure!(
        label.pitching.list_pitchings(id).await?.is_empty(),
        "nothing should be stored"
    );
    Ok(())
}
