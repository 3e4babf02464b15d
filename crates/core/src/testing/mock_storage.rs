//! Mock storage for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{Storage, StorageError, UploadOptions, UploadedReference};

/// A recorded upload for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    /// Local path that was uploaded.
    pub path: PathBuf,
    /// File name component of `path`.
    pub file_name: String,
    /// Group the upload belonged to.
    pub group: String,
    /// Caption passed with the upload.
    pub caption: Option<String>,
    /// Reference handed back to the caller.
    pub reference: UploadedReference,
}

/// Mock implementation of the Storage trait.
///
/// Provides controllable behavior for testing:
/// - Track uploads in order for assertions
/// - Fail the upload of a specific file name (once)
/// - Fail the access check or path resolution
///
/// Locators are sequential message ids starting at 1, like a fresh channel.
#[derive(Debug, Clone)]
pub struct MockStorage {
    destination: String,
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
    failures: Arc<RwLock<HashMap<String, StorageError>>>,
    access_error: Arc<RwLock<Option<StorageError>>>,
    resolve_error: Arc<RwLock<Option<StorageError>>>,
    access_checks: Arc<RwLock<usize>>,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorage {
    /// Create a new mock storage posting to `-1001234567890`.
    pub fn new() -> Self {
        Self::with_destination("-1001234567890")
    }

    /// Create a mock storage with a custom destination id.
    pub fn with_destination(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            uploads: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            access_error: Arc::new(RwLock::new(None)),
            resolve_error: Arc::new(RwLock::new(None)),
            access_checks: Arc::new(RwLock::new(0)),
        }
    }

    /// Get all recorded uploads, in order.
    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    /// Get the number of access checks performed.
    pub async fn access_check_count(&self) -> usize {
        *self.access_checks.read().await
    }

    /// Fail the next upload of a file named `file_name`.
    pub async fn fail_on(&self, file_name: impl Into<String>, error: StorageError) {
        self.failures.write().await.insert(file_name.into(), error);
    }

    /// Make the next access check fail.
    pub async fn set_access_error(&self, error: StorageError) {
        *self.access_error.write().await = Some(error);
    }

    /// Make the next path resolution fail.
    pub async fn set_resolve_error(&self, error: StorageError) {
        *self.resolve_error.write().await = Some(error);
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check_access(&self) -> Result<(), StorageError> {
        *self.access_checks.write().await += 1;
        match self.access_error.write().await.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn upload(
        &self,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<UploadedReference, StorageError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(e) = self.failures.write().await.remove(&file_name) {
            return Err(e);
        }

        let mut uploads = self.uploads.write().await;
        let reference = UploadedReference {
            destination: self.destination.clone(),
            locator: (uploads.len() + 1).to_string(),
            file_id: Some(format!("file-{}", file_name)),
        };
        uploads.push(RecordedUpload {
            path: path.to_path_buf(),
            file_name,
            group: options.group.clone(),
            caption: options.caption.clone(),
            reference: reference.clone(),
        });
        Ok(reference)
    }

    async fn resolve_path(&self, reference: &UploadedReference) -> Result<String, StorageError> {
        if let Some(e) = self.resolve_error.write().await.take() {
            return Err(e);
        }
        let file_id = reference
            .file_id
            .as_deref()
            .ok_or_else(|| StorageError::ResolveFailed {
                reason: "no file id".to_string(),
            })?;
        Ok(format!("documents/{}", file_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_locators_are_sequential() {
        let storage = MockStorage::new();
        let options = UploadOptions::new("req");
        let first = storage.upload(Path::new("/a/index.m3u8"), &options).await.unwrap();
        let second = storage.upload(Path::new("/a/segment000.ts"), &options).await.unwrap();
        assert_eq!(first.locator, "1");
        assert_eq!(second.locator, "2");
        assert_eq!(
            storage.resolve_path(&first).await.unwrap(),
            "documents/file-index.m3u8"
        );
    }

    #[tokio::test]
    async fn test_failure_is_one_shot() {
        let storage = MockStorage::new();
        storage.fail_on("a.ts", StorageError::transient("boom")).await;
        let options = UploadOptions::new("req");
        assert!(storage.upload(Path::new("/a.ts"), &options).await.is_err());
        assert!(storage.upload(Path::new("/a.ts"), &options).await.is_ok());
    }
}
