//! Diesel row models for release persistence.

use super::schema::{pitchings, release_tracks, releases};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for release records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = releases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReleaseRow {
    /// Release identifier.
    pub id: uuid::Uuid,
    /// Owning artist.
    pub owner_id: uuid::Uuid,
    /// Release title.
    pub name: String,
    /// Cover asset URL.
    pub cover_url: Option<String>,
    /// Cover asset file name.
    pub cover_name: Option<String>,
    /// Cover asset size in bytes.
    pub cover_size: Option<i64>,
    /// Street date.
    pub release_date: Option<NaiveDate>,
    /// Preorder opening date.
    pub preorder_date: Option<NaiveDate>,
    /// Sales start date.
    pub sales_start_date: Option<NaiveDate>,
    /// Genre label.
    pub genre: Option<String>,
    /// Copyright line.
    pub copyright: Option<String>,
    /// Store price tier.
    pub price_category: Option<String>,
    /// Language of the release title.
    pub title_language: Option<String>,
    /// Moderation status.
    pub status: String,
    /// Reviewer comment.
    pub review_comment: Option<String>,
    /// Reviewer identifier.
    pub reviewer_id: Option<uuid::Uuid>,
    /// Reviewer display name.
    pub reviewer_name: Option<String>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Write counter used for optimistic concurrency.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for release records.
///
/// `None` values are written as `NULL` so clearing a review decision or a
/// cover persists.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = releases)]
#[diesel(treat_none_as_null = true)]
pub struct ReleaseWriteRow {
    /// Release identifier.
    pub id: uuid::Uuid,
    /// Owning artist.
    pub owner_id: uuid::Uuid,
    /// Release title.
    pub name: String,
    /// Cover asset URL.
    pub cover_url: Option<String>,
    /// Cover asset file name.
    pub cover_name: Option<String>,
    /// Cover asset size in bytes.
    pub cover_size: Option<i64>,
    /// Street date.
    pub release_date: Option<NaiveDate>,
    /// Preorder opening date.
    pub preorder_date: Option<NaiveDate>,
    /// Sales start date.
    pub sales_start_date: Option<NaiveDate>,
    /// Genre label.
    pub genre: Option<String>,
    /// Copyright line.
    pub copyright: Option<String>,
    /// Store price tier.
    pub price_category: Option<String>,
    /// Language of the release title.
    pub title_language: Option<String>,
    /// Moderation status.
    pub status: String,
    /// Reviewer comment.
    pub review_comment: Option<String>,
    /// Reviewer identifier.
    pub reviewer_id: Option<uuid::Uuid>,
    /// Reviewer display name.
    pub reviewer_name: Option<String>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Write counter used for optimistic concurrency.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result and insert model for track records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = release_tracks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TrackRow {
    /// Owning release.
    pub release_id: uuid::Uuid,
    /// One-based position.
    pub track_number: i32,
    /// Track title.
    pub title: String,
    /// Composer credit.
    pub composer: String,
    /// Performance language.
    pub language: String,
    /// Audio asset URL.
    pub audio_url: Option<String>,
    /// Audio asset file name.
    pub audio_name: Option<String>,
    /// Audio asset size in bytes.
    pub audio_size: Option<i64>,
    /// Lyricist credit.
    pub lyricist: Option<String>,
    /// Lyrics text.
    pub lyrics: Option<String>,
    /// Preview start offset in seconds.
    pub preview_offset: Option<i32>,
    /// Explicit-content flag.
    pub explicit: bool,
}

/// Query result and insert model for pitching records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pitchings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PitchingRow {
    /// Pitching identifier.
    pub id: uuid::Uuid,
    /// Promoted release.
    pub release_id: uuid::Uuid,
    /// Submitting artist.
    pub submitted_by: uuid::Uuid,
    /// Artist description.
    pub artist_description: String,
    /// Release description.
    pub release_description: String,
    /// Playlist fit text.
    pub playlist_fit: String,
    /// Current reach text.
    pub current_reach: String,
    /// Preview link.
    pub preview_link: String,
    /// Photo asset references as a JSON array.
    pub photos: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
