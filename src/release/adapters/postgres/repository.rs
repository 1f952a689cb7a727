//! `PostgreSQL` repositories for releases and pitchings.

use super::{
    models::{PitchingRow, ReleaseRow, ReleaseWriteRow, TrackRow},
    schema::{pitchings, release_tracks, releases},
};
use crate::release::{
    domain::{
        AssetRef, PersistedPitchingData, PersistedReleaseData, Pitching, PitchingId, Release,
        ReleaseDetails, ReleaseId, ReleaseStatus, ReleaseVersion, ReviewRecord, Track, TrackDraft,
        TrackList, TrackNumber, UserId,
    },
    ports::{
        PitchingRepository, PitchingRepositoryError, PitchingRepositoryResult, ReleaseRepository,
        ReleaseRepositoryError, ReleaseRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by release adapters.
pub type ReleasePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed release repository.
///
/// Guarded writes run in one transaction: a conditional `UPDATE` on the
/// expected status and revision followed by a full replacement of the track
/// rows.
#[derive(Debug, Clone)]
pub struct PostgresReleaseRepository {
    pool: ReleasePgPool,
}

impl PostgresReleaseRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReleasePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReleaseRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReleaseRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReleaseRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReleaseRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReleaseRepository for PostgresReleaseRepository {
    async fn store(&self, release: &Release) -> ReleaseRepositoryResult<()> {
        let release_id = release.id();
        let row = to_write_row(release)?;
        let track_rows = to_track_rows(release)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, ReleaseRepositoryError, _>(|tx| {
                diesel::insert_into(releases::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ReleaseRepositoryError::DuplicateRelease(release_id)
                        }
                        _ => ReleaseRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(release_tracks::table)
                    .values(&track_rows)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_if_current(
        &self,
        release: &Release,
        expected: ReleaseVersion,
    ) -> ReleaseRepositoryResult<()> {
        let release_id = release.id();
        let row = to_write_row(release)?;
        let track_rows = to_track_rows(release)?;
        let expected_revision = to_revision_column(expected.revision)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, ReleaseRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    releases::table
                        .filter(releases::id.eq(release_id.into_inner()))
                        .filter(releases::status.eq(expected.status.as_str()))
                        .filter(releases::revision.eq(expected_revision)),
                )
                .set(&row)
                .execute(tx)?;
                if updated == 0 {
                    return Err(missed_guard(
                        tx,
                        release_id,
                        expected.status,
                        Some(expected.revision),
                    )?);
                }

                diesel::delete(
                    release_tracks::table
                        .filter(release_tracks::release_id.eq(release_id.into_inner())),
                )
                .execute(tx)?;
                diesel::insert_into(release_tracks::table)
                    .values(&track_rows)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: ReleaseId) -> ReleaseRepositoryResult<Option<Release>> {
        self.run_blocking(move |connection| {
            let row = releases::table
                .filter(releases::id.eq(id.into_inner()))
                .select(ReleaseRow::as_select())
                .first::<ReleaseRow>(connection)
                .optional()?;
            let Some(release_row) = row else {
                return Ok(None);
            };
            let mut releases = load_with_tracks(connection, vec![release_row])?;
            Ok(releases.pop())
        })
        .await
    }

    async fn find_by_owner(&self, owner_id: UserId) -> ReleaseRepositoryResult<Vec<Release>> {
        self.run_blocking(move |connection| {
            let rows = releases::table
                .filter(releases::owner_id.eq(owner_id.into_inner()))
                .order(releases::created_at.desc())
                .select(ReleaseRow::as_select())
                .load::<ReleaseRow>(connection)?;
            load_with_tracks(connection, rows)
        })
        .await
    }

    async fn find_by_status(&self, status: ReleaseStatus) -> ReleaseRepositoryResult<Vec<Release>> {
        self.run_blocking(move |connection| {
            let rows = releases::table
                .filter(releases::status.eq(status.as_str()))
                .order(releases::created_at.asc())
                .select(ReleaseRow::as_select())
                .load::<ReleaseRow>(connection)?;
            load_with_tracks(connection, rows)
        })
        .await
    }

    async fn delete_if_status(
        &self,
        id: ReleaseId,
        expected: ReleaseStatus,
    ) -> ReleaseRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReleaseRepositoryError, _>(|tx| {
                // Track and pitching rows go with the release through ON DELETE CASCADE.
                let deleted = diesel::delete(
                    releases::table
                        .filter(releases::id.eq(id.into_inner()))
                        .filter(releases::status.eq(expected.as_str())),
                )
                .execute(tx)?;
                if deleted == 0 {
                    return Err(missed_guard(tx, id, expected, None)?);
                }
                Ok(())
            })
        })
        .await
    }
}

/// Explains why a guarded write matched no row.
///
/// A status mismatch wins over a revision mismatch.
fn missed_guard(
    connection: &mut PgConnection,
    id: ReleaseId,
    expected_status: ReleaseStatus,
    expected_revision: Option<u64>,
) -> ReleaseRepositoryResult<ReleaseRepositoryError> {
    let current = releases::table
        .filter(releases::id.eq(id.into_inner()))
        .select((releases::status, releases::revision))
        .first::<(String, i64)>(connection)
        .optional()?;
    let Some((raw_status, raw_revision)) = current else {
        return Ok(ReleaseRepositoryError::NotFound(id));
    };
    let actual =
        ReleaseStatus::try_from(raw_status.as_str()).map_err(ReleaseRepositoryError::persistence)?;
    if actual != expected_status {
        return Ok(ReleaseRepositoryError::StatusConflict {
            id,
            expected: expected_status,
            actual,
        });
    }
    let actual_revision = from_revision_column(raw_revision)?;
    match expected_revision {
        Some(expected) if expected != actual_revision => {
            Ok(ReleaseRepositoryError::RevisionConflict {
                id,
                expected,
                actual: actual_revision,
            })
        }
        _ => Err(ReleaseRepositoryError::persistence(std::io::Error::other(
            format!("guarded write on release {id} matched no row"),
        ))),
    }
}

fn to_revision_column(revision: u64) -> ReleaseRepositoryResult<i64> {
    i64::try_from(revision).map_err(ReleaseRepositoryError::persistence)
}

fn from_revision_column(revision: i64) -> ReleaseRepositoryResult<u64> {
    u64::try_from(revision).map_err(ReleaseRepositoryError::persistence)
}

fn load_with_tracks(
    connection: &mut PgConnection,
    rows: Vec<ReleaseRow>,
) -> ReleaseRepositoryResult<Vec<Release>> {
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let track_rows = release_tracks::table
        .filter(release_tracks::release_id.eq_any(&ids))
        .order((release_tracks::release_id, release_tracks::track_number))
        .select(TrackRow::as_select())
        .load::<TrackRow>(connection)?;

    let mut tracks_by_release: HashMap<uuid::Uuid, Vec<Track>> = HashMap::new();
    for track_row in track_rows {
        let release_id = track_row.release_id;
        let track = row_to_track(track_row)?;
        tracks_by_release.entry(release_id).or_default().push(track);
    }

    rows.into_iter()
        .map(|row| {
            let tracks = tracks_by_release.remove(&row.id).unwrap_or_default();
            row_to_release(row, tracks)
        })
        .collect()
}

fn to_write_row(release: &Release) -> ReleaseRepositoryResult<ReleaseWriteRow> {
    let details = release.details();
    let cover = details.cover.as_ref();
    let cover_size = cover
        .map(|asset| i64::try_from(asset.file_size()))
        .transpose()
        .map_err(ReleaseRepositoryError::persistence)?;
    let review = release.review();

    Ok(ReleaseWriteRow {
        id: release.id().into_inner(),
        owner_id: release.owner_id().into_inner(),
        name: details.name.clone(),
        cover_url: cover.map(|asset| asset.url().to_string()),
        cover_name: cover.map(|asset| asset.file_name().to_owned()),
        cover_size,
        release_date: details.release_date,
        preorder_date: details.preorder_date,
        sales_start_date: details.sales_start_date,
        genre: details.genre.clone(),
        copyright: details.copyright.clone(),
        price_category: details.price_category.clone(),
        title_language: details.title_language.clone(),
        status: release.status().as_str().to_owned(),
        review_comment: review.map(|record| record.comment.clone()),
        reviewer_id: review.map(|record| record.reviewer_id.into_inner()),
        reviewer_name: review.map(|record| record.reviewer_name.clone()),
        reviewed_at: review.map(|record| record.reviewed_at),
        revision: to_revision_column(release.revision())?,
        created_at: release.created_at(),
        updated_at: release.updated_at(),
    })
}

fn to_track_rows(release: &Release) -> ReleaseRepositoryResult<Vec<TrackRow>> {
    release
        .tracks()
        .iter()
        .map(|track| {
            let fields = track.fields();
            let audio = fields.audio.as_ref();
            Ok(TrackRow {
                release_id: release.id().into_inner(),
                track_number: i32::try_from(track.number().value())
                    .map_err(ReleaseRepositoryError::persistence)?,
                title: fields.title.clone(),
                composer: fields.composer.clone(),
                language: fields.language.clone(),
                audio_url: audio.map(|asset| asset.url().to_string()),
                audio_name: audio.map(|asset| asset.file_name().to_owned()),
                audio_size: audio
                    .map(|asset| i64::try_from(asset.file_size()))
                    .transpose()
                    .map_err(ReleaseRepositoryError::persistence)?,
                lyricist: fields.lyricist.clone(),
                lyrics: fields.lyrics.clone(),
                preview_offset: fields
                    .preview_offset_secs
                    .map(i32::try_from)
                    .transpose()
                    .map_err(ReleaseRepositoryError::persistence)?,
                explicit: fields.explicit,
            })
        })
        .collect()
}

fn row_to_release(row: ReleaseRow, tracks: Vec<Track>) -> ReleaseRepositoryResult<Release> {
    let status =
        ReleaseStatus::try_from(row.status.as_str()).map_err(ReleaseRepositoryError::persistence)?;
    let cover = row_to_asset(row.cover_url, row.cover_name, row.cover_size)?;
    let review = match (row.reviewer_id, row.reviewer_name, row.reviewed_at) {
        (Some(reviewer_id), Some(reviewer_name), Some(reviewed_at)) => Some(ReviewRecord {
            comment: row.review_comment.unwrap_or_default(),
            reviewer_id: UserId::from_uuid(reviewer_id),
            reviewer_name,
            reviewed_at,
        }),
        _ => None,
    };
    let revision = from_revision_column(row.revision)?;

    Ok(Release::from_persisted(PersistedReleaseData {
        id: ReleaseId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        details: ReleaseDetails {
            name: row.name,
            cover,
            release_date: row.release_date,
            preorder_date: row.preorder_date,
            sales_start_date: row.sales_start_date,
            genre: row.genre,
            copyright: row.copyright,
            price_category: row.price_category,
            title_language: row.title_language,
        },
        tracks: TrackList::from_persisted(tracks),
        status,
        review,
        revision,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_track(row: TrackRow) -> ReleaseRepositoryResult<Track> {
    let number = u32::try_from(row.track_number)
        .ok()
        .and_then(TrackNumber::new)
        .ok_or_else(|| {
            ReleaseRepositoryError::persistence(std::io::Error::other(format!(
                "invalid stored track number {}",
                row.track_number
            )))
        })?;
    let audio = row_to_asset(row.audio_url, row.audio_name, row.audio_size)?;
    let preview_offset_secs = row
        .preview_offset
        .map(u32::try_from)
        .transpose()
        .map_err(ReleaseRepositoryError::persistence)?;

    Ok(Track::from_persisted(
        number,
        TrackDraft {
            title: row.title,
            composer: row.composer,
            language: row.language,
            audio,
            lyricist: row.lyricist,
            lyrics: row.lyrics,
            preview_offset_secs,
            explicit: row.explicit,
        },
    ))
}

fn row_to_asset(
    url: Option<String>,
    name: Option<String>,
    size: Option<i64>,
) -> ReleaseRepositoryResult<Option<AssetRef>> {
    let (Some(asset_url), Some(asset_name), Some(asset_size)) = (url, name, size) else {
        return Ok(None);
    };
    let file_size = u64::try_from(asset_size).map_err(ReleaseRepositoryError::persistence)?;
    AssetRef::parse(&asset_url, asset_name, file_size)
        .map(Some)
        .map_err(ReleaseRepositoryError::persistence)
}

/// `PostgreSQL`-backed pitching repository.
#[derive(Debug, Clone)]
pub struct PostgresPitchingRepository {
    pool: ReleasePgPool,
}

impl PostgresPitchingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReleasePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PitchingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PitchingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PitchingRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PitchingRepositoryError::persistence)?
    }
}

#[async_trait]
impl PitchingRepository for PostgresPitchingRepository {
    async fn store_if_release_status(
        &self,
        pitching: &Pitching,
        expected: ReleaseStatus,
    ) -> PitchingRepositoryResult<()> {
        let pitching_id = pitching.id();
        let release_id = pitching.release_id();
        let row = to_pitching_row(pitching)?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, PitchingRepositoryError, _>(|tx| {
                // The row lock holds off concurrent resets until the insert commits.
                let current = releases::table
                    .filter(releases::id.eq(release_id.into_inner()))
                    .select(releases::status)
                    .for_update()
                    .get_result::<String>(tx)
                    .optional()?;
                let Some(raw_status) = current else {
                    return Err(PitchingRepositoryError::ReleaseNotFound(release_id));
                };
                let actual = ReleaseStatus::try_from(raw_status.as_str())
                    .map_err(PitchingRepositoryError::persistence)?;
                if actual != expected {
                    return Err(PitchingRepositoryError::ReleaseStatusMismatch {
                        release_id,
                        expected,
                        actual,
                    });
                }
                diesel::insert_into(pitchings::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            PitchingRepositoryError::DuplicatePitching(pitching_id)
                        }
                        _ => PitchingRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_release(
        &self,
        release_id: ReleaseId,
    ) -> PitchingRepositoryResult<Vec<Pitching>> {
        self.run_blocking(move |connection| {
            let rows = pitchings::table
                .filter(pitchings::release_id.eq(release_id.into_inner()))
                .order(pitchings::created_at.asc())
                .select(PitchingRow::as_select())
                .load::<PitchingRow>(connection)?;
            rows.into_iter().map(row_to_pitching).collect()
        })
        .await
    }
}

fn to_pitching_row(pitching: &Pitching) -> PitchingRepositoryResult<PitchingRow> {
    let photos =
        serde_json::to_value(pitching.photos()).map_err(PitchingRepositoryError::persistence)?;
    Ok(PitchingRow {
        id: pitching.id().into_inner(),
        release_id: pitching.release_id().into_inner(),
        submitted_by: pitching.submitted_by().into_inner(),
        artist_description: pitching.artist_description().to_owned(),
        release_description: pitching.release_description().to_owned(),
        playlist_fit: pitching.playlist_fit().to_owned(),
        current_reach: pitching.current_reach().to_owned(),
        preview_link: pitching.preview_link().to_string(),
        photos,
        created_at: pitching.created_at(),
    })
}

fn row_to_pitching(row: PitchingRow) -> PitchingRepositoryResult<Pitching> {
    let photos = serde_json::from_value::<Vec<AssetRef>>(row.photos)
        .map_err(PitchingRepositoryError::persistence)?;
    let preview_link =
        url::Url::parse(&row.preview_link).map_err(PitchingRepositoryError::persistence)?;
    Ok(Pitching::from_persisted(PersistedPitchingData {
        id: PitchingId::from_uuid(row.id),
        release_id: ReleaseId::from_uuid(row.release_id),
        submitted_by: UserId::from_uuid(row.submitted_by),
        artist_description: row.artist_description,
        release_description: row.release_description,
        playlist_fit: row.playlist_fit,
        current_reach: row.current_reach,
        preview_link,
        photos,
        created_at: row.created_at,
    }))
}
