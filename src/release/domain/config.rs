//! Tunable limits for release validation.

use serde::{Deserialize, Serialize};

/// Size and count limits applied by the lifecycle engine.
///
/// # Examples
///
/// ```rust
/// use labeldesk::release::domain::ReleaseConfig;
///
/// let config = ReleaseConfig::default();
/// assert_eq!(config.max_audio_bytes, 50 * 1024 * 1024);
/// assert_eq!(config.max_pitching_photos, 5);
///
/// let strict = ReleaseConfig::strict();
/// assert!(strict.max_audio_bytes < config.max_audio_bytes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Largest accepted track audio asset in bytes.
    pub max_audio_bytes: u64,
    /// Fewest photos a pitching may carry.
    pub min_pitching_photos: usize,
    /// Most photos a pitching may carry.
    pub max_pitching_photos: usize,
    /// Whether reviewers are notified when a release enters moderation.
    pub notify_reviewers_on_submit: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            max_audio_bytes: 50 * 1024 * 1024, // 50 MiB
            min_pitching_photos: 1,
            max_pitching_photos: 5,
            notify_reviewers_on_submit: true,
        }
    }
}

impl ReleaseConfig {
    /// Creates a configuration with reduced limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_audio_bytes: 10 * 1024 * 1024, // 10 MiB
            min_pitching_photos: 1,
            max_pitching_photos: 3,
            notify_reviewers_on_submit: true,
        }
    }

    /// Parses a configuration from JSON, filling absent keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the document is malformed.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
