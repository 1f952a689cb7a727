//! When steps for release moderation BDD scenarios.

use super::world::{ModerationWorld, run_async};
use labeldesk::release::{
    domain::{AssetRef, PitchingDraft, ReviewVerdict},
    services::ReviewRequest,
};
use rstest_bdd_macros::when;

#[when("the artist submits the release")]
fn artist_submits(world: &mut ModerationWorld) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let result = run_async(world.lifecycle.submit(&world.artist, id));
    world.record(result);
    Ok(())
}

#[when("the artist resubmits the release")]
fn artist_resubmits(world: &mut ModerationWorld) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let result = run_async(world.lifecycle.resubmit(&world.artist, id));
    world.record(result);
    Ok(())
}

#[when(r#"a manager reviews the release as "{verdict}" with comment "{comment}""#)]
fn manager_reviews(
    world: &mut ModerationWorld,
    verdict: String,
    comment: String,
) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let parsed = ReviewVerdict::try_from(verdict.as_str())
        .map_err(|err| eyre::eyre!("invalid verdict in scenario: {err}"))?;
    let result = run_async(
        world
            .lifecycle
            .review(&world.manager, ReviewRequest::new(id, parsed, comment)),
    );
    world.record(result);
    Ok(())
}

#[when("a manager rejects the release as fixable without a comment")]
fn manager_rejects_without_comment(world: &mut ModerationWorld) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let result = run_async(world.lifecycle.review(
        &world.manager,
        ReviewRequest::new(id, ReviewVerdict::RejectedFixable, "   "),
    ));
    world.record(result);
    Ok(())
}

#[when("the artist pitches the release with {photos:usize} photos")]
fn artist_pitches(world: &mut ModerationWorld, photos: usize) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let draft = PitchingDraft {
        artist_description: "Ambient producer from Lisbon".to_owned(),
        release_description: "Slow-moving textures".to_owned(),
        playlist_fit: "Deep focus".to_owned(),
        current_reach: "4k followers".to_owned(),
        preview_link: "https://preview.example.com/tidal-glass".to_owned(),
        photos: (0..photos)
            .map(|n| {
                AssetRef::parse(
                    &format!("https://cdn.example.com/press-{n}.jpg"),
                    format!("press-{n}.jpg"),
                    900,
                )
            })
            .collect::<Result<_, _>>()?,
    };
    let result = run_async(world.pitching.submit_pitching(&world.artist, id, draft));
    world.record(result);
    Ok(())
}

#[when("the artist removes the track at index {index:usize}")]
fn artist_removes_track(world: &mut ModerationWorld, index: usize) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    let result = run_async(world.tracks.remove_track(&world.artist, id, index));
    world.record(result);
    Ok(())
}
