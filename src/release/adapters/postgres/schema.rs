//! Diesel schema for release lifecycle persistence.

diesel::table! {
    /// Release records with moderation state.
    releases (id) {
        /// Release identifier.
        id -> Uuid,
        /// Owning artist.
        owner_id -> Uuid,
        /// Release title.
        #[max_length = 255]
        name -> Varchar,
        /// Cover asset URL.
        cover_url -> Nullable<Text>,
        /// Cover asset file name.
        #[max_length = 255]
        cover_name -> Nullable<Varchar>,
        /// Cover asset size in bytes.
        cover_size -> Nullable<Int8>,
        /// Street date.
        release_date -> Nullable<Date>,
        /// Preorder opening date.
        preorder_date -> Nullable<Date>,
        /// Sales start date.
        sales_start_date -> Nullable<Date>,
        /// Genre label.
        #[max_length = 100]
        genre -> Nullable<Varchar>,
        /// Copyright line.
        #[max_length = 255]
        copyright -> Nullable<Varchar>,
        /// Store price tier.
        #[max_length = 50]
        price_category -> Nullable<Varchar>,
        /// Language of the release title.
        #[max_length = 50]
        title_language -> Nullable<Varchar>,
        /// Moderation status.
        #[max_length = 50]
        status -> Varchar,
        /// Reviewer comment.
        review_comment -> Nullable<Text>,
        /// Reviewer identifier.
        reviewer_id -> Nullable<Uuid>,
        /// Reviewer display name.
        #[max_length = 255]
        reviewer_name -> Nullable<Varchar>,
        /// Review timestamp.
        reviewed_at -> Nullable<Timestamptz>,
        /// Write counter used for optimistic concurrency.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracks keyed by release and dense position.
    release_tracks (release_id, track_number) {
        /// Owning release.
        release_id -> Uuid,
        /// One-based position.
        track_number -> Int4,
        /// Track title.
        #[max_length = 255]
        title -> Varchar,
        /// Composer credit.
        #[max_length = 255]
        composer -> Varchar,
        /// Performance language.
        #[max_length = 50]
        language -> Varchar,
        /// Audio asset URL.
        audio_url -> Nullable<Text>,
        /// Audio asset file name.
        #[max_length = 255]
        audio_name -> Nullable<Varchar>,
        /// Audio asset size in bytes.
        audio_size -> Nullable<Int8>,
        /// Lyricist credit.
        #[max_length = 255]
        lyricist -> Nullable<Varchar>,
        /// Lyrics text.
        lyrics -> Nullable<Text>,
        /// Preview start offset in seconds.
        preview_offset -> Nullable<Int4>,
        /// Explicit-content flag.
        explicit -> Bool,
    }
}

diesel::table! {
    /// Pitching submissions for approved releases.
    pitchings (id) {
        /// Pitching identifier.
        id -> Uuid,
        /// Promoted release.
        release_id -> Uuid,
        /// Submitting artist.
        submitted_by -> Uuid,
        /// Artist description.
        artist_description -> Text,
        /// Release description.
        release_description -> Text,
        /// Playlist fit text.
        playlist_fit -> Text,
        /// Current reach text.
        current_reach -> Text,
        /// Preview link.
        preview_link -> Text,
        /// Photo asset references.
        photos -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(release_tracks -> releases (release_id));
diesel::joinable!(pitchings -> releases (release_id));
diesel::allow_tables_to_appear_in_same_query!(releases, release_tracks, pitchings);
