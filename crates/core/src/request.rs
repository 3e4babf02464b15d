//! Incoming media requests and the source they are downloaded from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Kind of attachment a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Document,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Document => "document",
            Self::Audio => "audio",
        }
    }

    /// Extension used when the sender gave no file name.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
            Self::Document => "bin",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media submission. Lives for a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRequest {
    /// Unique id, also used to name the workspace and group uploads.
    pub id: String,
    /// Chat the file came from; replies go here.
    pub chat_id: i64,
    /// Remote file id used to download the attachment.
    pub file_id: String,
    /// Original file name, or a generated one.
    pub file_name: String,
    /// Size reported by the sender; 0 when unknown.
    pub size_bytes: u64,
    pub kind: MediaKind,
}

impl MediaRequest {
    /// Creates a request, generating `file_<uuid>.<ext>` when no name was sent.
    pub fn new(
        chat_id: i64,
        file_id: impl Into<String>,
        file_name: Option<String>,
        size_bytes: u64,
        kind: MediaKind,
    ) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        let file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("file_{}.{}", id, kind.default_extension()));
        Self {
            id,
            chat_id,
            file_id: file_id.into(),
            file_name,
            size_bytes,
            kind,
        }
    }
}

/// Errors that can occur while fetching the attachment.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The source refused to serve this file (e.g. over its size limit).
    #[error("Download rejected: {reason}")]
    Rejected { reason: String },

    /// Network or service hiccup.
    #[error("Download failed: {reason}")]
    Transient { reason: String },

    /// Writing the local copy failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where attachments are downloaded from.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Downloads the attachment of `request` to `destination`, returning bytes written.
    async fn download(&self, request: &MediaRequest, destination: &Path)
        -> Result<u64, DownloadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_file_name_uses_kind_extension() {
        let request = MediaRequest::new(1, "f", None, 10, MediaKind::Video);
        assert!(request.file_name.starts_with("file_"));
        assert!(request.file_name.ends_with(".mp4"));
        assert!(request.file_name.contains(&request.id));

        let audio = MediaRequest::new(1, "f", Some("  ".to_string()), 10, MediaKind::Audio);
        assert!(audio.file_name.ends_with(".mp3"));
    }

    #[test]
    fn test_original_name_is_kept() {
        let request = MediaRequest::new(1, "f", Some("clip.mkv".to_string()), 0, MediaKind::Document);
        assert_eq!(request.file_name, "clip.mkv");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = MediaRequest::new(1, "f", None, 0, MediaKind::Video);
        let b = MediaRequest::new(1, "f", None, 0, MediaKind::Video);
        assert_ne!(a.id, b.id);
    }
}
