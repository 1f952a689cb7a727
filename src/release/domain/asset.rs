//! Uploaded asset references and pending uploads.

use super::{TrackNumber, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Completed upload returned by the asset upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    url: Url,
    file_name: String,
    file_size: u64,
}

impl AssetRef {
    /// Creates an asset reference from an already parsed URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the file name is blank.
    pub fn new(
        url: Url,
        file_name: impl Into<String>,
        file_size: u64,
    ) -> Result<Self, ValidationError> {
        let raw_name = file_name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("asset file name"));
        }
        Ok(Self {
            url,
            file_name: trimmed.to_owned(),
            file_size,
        })
    }

    /// Creates an asset reference from the raw upload triple.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAssetUrl`] when `url` does not
    /// parse, or [`ValidationError::EmptyField`] for a blank file name.
    pub fn parse(
        url: &str,
        file_name: impl Into<String>,
        file_size: u64,
    ) -> Result<Self, ValidationError> {
        let parsed = Url::parse(url.trim())
            .map_err(|_| ValidationError::InvalidAssetUrl(url.to_owned()))?;
        Self::new(parsed, file_name, file_size)
    }

    /// Returns the asset URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the asset size in bytes.
    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }
}

/// A binary waiting to be handed to the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    /// Original file name.
    pub file_name: String,
    /// MIME type hint, if known.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl AssetUpload {
    /// Creates an upload without a content type hint.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Sets the content type hint.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Either an existing asset or one still to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// The asset was uploaded earlier.
    Uploaded(AssetRef),
    /// The asset must be uploaded before use.
    Pending(AssetUpload),
}

impl From<AssetRef> for AssetSource {
    fn from(value: AssetRef) -> Self {
        Self::Uploaded(value)
    }
}

impl From<AssetUpload> for AssetSource {
    fn from(value: AssetUpload) -> Self {
        Self::Pending(value)
    }
}

/// The place an asset belongs to, used to attribute upload failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSlot {
    /// The release cover image.
    Cover,
    /// The audio file of a track.
    TrackAudio(TrackNumber),
    /// A pitching photo, by zero-based position.
    PitchingPhoto(usize),
}

impl fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => f.write_str("cover"),
            Self::TrackAudio(number) => write!(f, "audio for track {number}"),
            Self::PitchingPhoto(index) => write!(f, "pitching photo {}", index + 1),
        }
    }
}
