//! In-memory integration tests for track ordering.

use super::helpers::{Label, label, numbered_titles, populated_track, submittable_details};
use labeldesk::release::{
    domain::{MoveDirection, ReleaseId},
    services::ErrorKind,
};
use rstest::rstest;

async fn release_with_tracks(label: &Label, titles: &[&str]) -> eyre::Result<ReleaseId> {
    let draft = label
        .lifecycle
        .create_draft(&label.artist, submittable_details("Tidal Glass")?)
        .await?;
    let drafts = titles
        .iter()
        .map(|title| populated_track(title))
        .collect::<eyre::Result<Vec<_>>>()?;
    label.tracks.add_tracks(&label.artist, draft.id(), drafts).await?;
    Ok(draft.id())
}

async fn titles(label: &Label, id: ReleaseId) -> eyre::Result<Vec<String>> {
    let release = label
        .lifecycle
        .find_by_id(id)
        .await?
        .ok_or_else(|| eyre::eyre!("release {id} should exist"))?;
    Ok(numbered_titles(&release))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_middle_track_renumbers_the_rest(label: Label) -> eyre::Result<()> {
    let id = release_with_tracks(&label, &["dawn", "noon", "dusk"]).await?;

    let removed = label.tracks.remove_track(&label.artist, id, 1).await?;

    eyre::ensure!(removed.title() == "noon", "wrong track removed");
    eyre::ensure!(
        titles(&label, id).await? == ["1:dawn", "2:dusk"],
        "remaining tracks should be renumbered"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_tracks_keeps_numbering_dense(label: Label) -> eyre::Result<()> {
    let id = release_with_tracks(&label, &["dawn", "noon", "dusk"]).await?;

    label
        .tracks
        .move_track(&label.artist, id, 2, MoveDirection::Up)
        .await?;
    label
        .tracks
        .move_track(&label.artist, id, 0, MoveDirection::Down)
        .await?;

    eyre::ensure!(
        titles(&label, id).await? == ["1:dusk", "2:dawn", "3:noon"],
        "unexpected order"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tracks_are_frozen_while_pending(label: Label) -> eyre::Result<()> {
    let id = release_with_tracks(&label, &["dawn"]).await?;
    label.lifecycle.submit(&label.artist, id).await?;

    let result = label
        .tracks
        .add_track(&label.artist, id, populated_track("late")?)
        .await;

    let Err(err) = result else {
        eyre::bail!("pending releases must not be edited");
    };
    eyre::ensure!(err.kind() == ErrorKind::InvalidTransition, "unexpected {err:?}");
    eyre::ensure!(titles(&label, id).await? == ["1:dawn"], "tracks should be unchanged");
    Ok(())
}
