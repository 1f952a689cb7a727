//! Asset upload collaborator port.

use crate::release::domain::{AssetRef, AssetUpload};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for upload operations.
pub type AssetUploadResult<T> = Result<T, AssetUploadError>;

/// Blob storage that turns a binary into a durable asset reference.
///
/// No retry contract is defined; a failure is terminal for that asset.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Uploads a binary and returns its `{url, file_name, file_size}` triple.
    async fn upload(&self, upload: AssetUpload) -> AssetUploadResult<AssetRef>;
}

/// Errors returned by upload adapters.
#[derive(Debug, Clone, Error)]
pub enum AssetUploadError {
    /// The storage service refused the file.
    #[error("upload of '{file_name}' rejected: {reason}")]
    Rejected {
        /// File that was refused.
        file_name: String,
        /// Reason given by the storage service.
        reason: String,
    },

    /// Transport or storage failure.
    #[error("upload transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssetUploadError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
