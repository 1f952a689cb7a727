//! Then steps for release moderation BDD scenarios.

use super::world::{ModerationWorld, run_async};
use labeldesk::release::{domain::ReleaseStatus, services::ErrorKind};
use rstest_bdd_macros::then;

#[then(r#"the release status is "{status}""#)]
fn release_status_is(world: &ModerationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ReleaseStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let release = world.current_release()?;
    eyre::ensure!(
        release.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        release.status().as_str()
    );
    Ok(())
}

#[then(r#"the review comment is "{comment}""#)]
fn review_comment_is(world: &ModerationWorld, comment: String) -> Result<(), eyre::Report> {
    let release = world.current_release()?;
    let stored = release
        .review()
        .map(|record| record.comment.clone())
        .ok_or_else(|| eyre::eyre!("missing review record"))?;
    eyre::ensure!(stored == comment, "expected comment {comment:?}, found {stored:?}");
    Ok(())
}

#[then(r#"the operation fails with a "{kind}" error"#)]
fn operation_fails_with(world: &ModerationWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = match kind.as_str() {
        "validation" => ErrorKind::Validation,
        "invalid transition" => ErrorKind::InvalidTransition,
        "precondition" => ErrorKind::Precondition,
        "not found" => ErrorKind::NotFound,
        "forbidden" => ErrorKind::Forbidden,
        other => eyre::bail!("unknown error kind in scenario: {other}"),
    };
    eyre::ensure!(
        world.last_error == Some(expected),
        "expected {expected:?} error, found {:?}",
        world.last_error
    );
    Ok(())
}

#[then("the release has {count:usize} pitchings")]
fn release_has_pitchings(world: &ModerationWorld, count: usize) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let pitchings = run_async(world.pitching.list_pitchings(id))?;
    eyre::ensure!(
        pitchings.len() == count,
        "expected {count} pitchings, found {}",
        pitchings.len()
    );
    Ok(())
}

#[then(r#"the track list is "{listing}""#)]
fn track_list_is(world: &ModerationWorld, listing: String) -> Result<(), eyre::Report> {
    let release = world.current_release()?;
    let actual = release
        .tracks()
        .iter()
        .map(|track| format!("{}:{}", track.number(), track.title()))
        .collect::<Vec<_>>()
        .join(", ");
    eyre::ensure!(actual == listing, "expected tracks {listing}, found {actual}");
    Ok(())
}
