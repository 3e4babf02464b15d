//! Mock media source for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::request::{DownloadError, MediaRequest, MediaSource};

/// Mock implementation of the MediaSource trait.
///
/// Writes `content` to the requested destination, standing in for a
/// download from the chat platform.
#[derive(Debug, Clone)]
pub struct MockSource {
    content: Arc<RwLock<Vec<u8>>>,
    downloads: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<DownloadError>>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a mock source serving a small placeholder file.
    pub fn new() -> Self {
        Self {
            content: Arc::new(RwLock::new(b"mock media payload".to_vec())),
            downloads: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the bytes written for every download.
    pub async fn set_content(&self, content: impl Into<Vec<u8>>) {
        *self.content.write().await = content.into();
    }

    /// File ids downloaded so far, in order.
    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }

    /// Get the number of downloads attempted.
    pub async fn download_count(&self) -> usize {
        self.downloads.read().await.len()
    }

    /// Configure the next download to fail with the given error.
    pub async fn set_next_error(&self, error: DownloadError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl MediaSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn download(
        &self,
        request: &MediaRequest,
        destination: &Path,
    ) -> Result<u64, DownloadError> {
        self.downloads.write().await.push(request.file_id.clone());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let content = self.content.read().await.clone();
        tokio::fs::write(destination, &content).await?;
        Ok(content.len() as u64)
    }
}
