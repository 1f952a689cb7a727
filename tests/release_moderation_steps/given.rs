//! Given steps for release moderation BDD scenarios.

use super::world::{ModerationWorld, run_async};
use chrono::NaiveDate;
use eyre::WrapErr;
use labeldesk::release::{
    domain::{AssetRef, ReleaseDetails, ReviewVerdict, TrackDraft},
    services::ReviewRequest,
};
use rstest_bdd_macros::given;

fn asset(file_name: &str, file_size: u64) -> eyre::Result<AssetRef> {
    Ok(AssetRef::parse(
        &format!("https://cdn.example.com/{file_name}"),
        file_name,
        file_size,
    )?)
}

#[given("an artist with a complete release of {count:usize} tracks")]
fn complete_release(world: &mut ModerationWorld, count: usize) -> Result<(), eyre::Report> {
    let date = NaiveDate::from_ymd_opt(2026, 12, 4)
        .ok_or_else(|| eyre::eyre!("invalid scenario date"))?;
    let details = ReleaseDetails::named("Tidal Glass")
        .with_cover(asset("cover.png", 2_048)?)
        .with_release_date(date);
    let drafts = (1..=count)
        .map(|n| {
            Ok(TrackDraft::new(format!("track-{n}"), "L. Writer", "en")
                .with_audio(asset(&format!("track-{n}.flac"), 4_096)?))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    let release = run_async(world.lifecycle.create_draft(&world.artist, details))
        .wrap_err("create draft for scenario")?;
    run_async(world.tracks.add_tracks(&world.artist, release.id(), drafts))
        .wrap_err("add tracks for scenario")?;
    world.release_id = Some(release.id());
    Ok(())
}

#[given("the release has been submitted")]
fn release_submitted(world: &mut ModerationWorld) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    run_async(world.lifecycle.submit(&world.artist, id)).wrap_err("submit in scenario setup")?;
    Ok(())
}

#[given("the release has been approved")]
fn release_approved(world: &mut ModerationWorld) -> Result<(), eyre::Report> {
    let id = world.release_id()?;
    run_async(world.lifecycle.review(
        &world.manager,
        ReviewRequest::new(id, ReviewVerdict::Approved, ""),
    ))
    .wrap_err("approve in scenario setup")?;
    Ok(())
}
