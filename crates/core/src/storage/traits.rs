//! Trait definitions for the storage module.

use async_trait::async_trait;
use std::path::Path;

use super::error::StorageError;
use super::types::{UploadOptions, UploadedReference};

/// A destination that accepts uploaded files and can locate them again.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the name of this storage implementation.
    fn name(&self) -> &str;

    /// Confirms the destination exists and the bot may write to it.
    async fn check_access(&self) -> Result<(), StorageError>;

    /// Uploads one local file.
    async fn upload(
        &self,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<UploadedReference, StorageError>;

    /// Remote path of an uploaded file, relative to the backend's file base URL.
    async fn resolve_path(&self, reference: &UploadedReference) -> Result<String, StorageError>;
}
