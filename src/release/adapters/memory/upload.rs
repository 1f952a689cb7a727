//! In-memory asset uploader for deterministic flows.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::release::{
    domain::{AssetRef, AssetUpload},
    ports::{AssetUploadError, AssetUploadResult, AssetUploader},
};

/// In-memory upload adapter.
///
/// Assigns `memory://assets/<n>/<file name>` URLs and records every upload.
/// File names registered with [`Self::fail_for`] are rejected, which lets
/// tests exercise per-asset failures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetUploader {
    state: Arc<RwLock<UploaderState>>,
}

#[derive(Debug, Default)]
struct UploaderState {
    uploaded: Vec<AssetRef>,
    failing: HashSet<String>,
}

impl InMemoryAssetUploader {
    /// Creates an uploader that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects future uploads of `file_name`.
    ///
    /// # Errors
    ///
    /// Returns upload transport errors when lock acquisition fails.
    pub fn fail_for(&self, file_name: impl Into<String>) -> AssetUploadResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AssetUploadError::transport(std::io::Error::other(err.to_string())))?;
        state.failing.insert(file_name.into());
        Ok(())
    }

    /// Returns every asset uploaded so far, in completion order.
    ///
    /// # Errors
    ///
    /// Returns upload transport errors when lock acquisition fails.
    pub fn uploaded(&self) -> AssetUploadResult<Vec<AssetRef>> {
        let state = self
            .state
            .read()
            .map_err(|err| AssetUploadError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state.uploaded.clone())
    }
}

#[async_trait]
impl AssetUploader for InMemoryAssetUploader {
    async fn upload(&self, upload: AssetUpload) -> AssetUploadResult<AssetRef> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AssetUploadError::transport(std::io::Error::other(err.to_string())))?;
        if state.failing.contains(&upload.file_name) {
            return Err(AssetUploadError::Rejected {
                file_name: upload.file_name,
                reason: "storage refused the file".to_owned(),
            });
        }

        let url = format!(
            "memory://assets/{}/{}",
            state.uploaded.len() + 1,
            upload.file_name
        );
        let size = u64::try_from(upload.bytes.len()).map_err(AssetUploadError::transport)?;
        let asset = AssetRef::parse(&url, upload.file_name.as_str(), size).map_err(|err| {
            AssetUploadError::Rejected {
                file_name: upload.file_name.clone(),
                reason: err.to_string(),
            }
        })?;
        state.uploaded.push(asset.clone());
        Ok(asset)
    }
}
