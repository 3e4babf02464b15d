//! Ordered upload of HLS artifacts.
//!
//! The playlist always goes first so that a failure there leaves nothing
//! half-published. Segments follow in playback order. What happens when a
//! single segment fails is governed by [`SegmentFailurePolicy`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::metrics::{result_label, UPLOADS_TOTAL};
use crate::storage::{Storage, StorageError, UploadOptions, UploadedReference};

/// What to do when one segment fails to upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentFailurePolicy {
    /// Stop at the first failing segment and fail the request.
    #[default]
    Abort,
    /// Record the failure and keep uploading the remaining segments.
    Continue,
}

/// A segment that could not be uploaded under [`SegmentFailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSegment {
    pub path: PathBuf,
    pub error: String,
}

/// Everything that reached storage for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Playlist, or the original file when conversion is disabled.
    pub primary: UploadedReference,
    /// Uploaded segments, in playback order.
    pub segments: Vec<UploadedReference>,
    /// Segments skipped after a failure.
    pub failed_segments: Vec<FailedSegment>,
}

impl UploadReport {
    /// Report for a single-file upload.
    pub fn single(primary: UploadedReference) -> Self {
        Self {
            primary,
            segments: Vec::new(),
            failed_segments: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed_segments.is_empty()
    }
}

/// Segment uploads that went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentUploads {
    pub uploaded: Vec<UploadedReference>,
    pub failed: Vec<FailedSegment>,
}

/// A segment upload that ended the sequence.
#[derive(Debug, Error)]
#[error("Segment {path} failed after {uploaded} segments were uploaded: {source}")]
pub struct SegmentUploadError {
    pub path: PathBuf,
    /// Segments uploaded before the failure.
    pub uploaded: usize,
    #[source]
    pub source: StorageError,
}

/// Caption attached to an uploaded playlist.
pub fn playlist_caption(original_name: &str) -> String {
    format!("HLS: {}", original_name)
}

/// Uploads the playlist (or a lone original file).
pub async fn upload_primary(
    storage: &dyn Storage,
    path: &Path,
    options: &UploadOptions,
    kind: &'static str,
) -> Result<UploadedReference, StorageError> {
    let result = storage.upload(path, options).await;
    UPLOADS_TOTAL
        .with_label_values(&[kind, result_label(&result)])
        .inc();

    match &result {
        Ok(reference) => info!(
            storage = storage.name(),
            kind,
            locator = %reference.locator,
            "Uploaded {}",
            path.display()
        ),
        Err(e) => warn!(storage = storage.name(), kind, error = %e, "Upload failed"),
    }
    result
}

/// Uploads segments strictly in the given order.
///
/// Errors that need an operator to step in end the sequence under either
/// policy, since every later upload would fail the same way.
pub async fn upload_segments(
    storage: &dyn Storage,
    segments: &[PathBuf],
    group: &str,
    policy: SegmentFailurePolicy,
) -> Result<SegmentUploads, SegmentUploadError> {
    let options = UploadOptions::new(group);
    let mut uploads = SegmentUploads::default();

    for (index, segment) in segments.iter().enumerate() {
        debug!(group, index, total = segments.len(), "Uploading segment");
        let result = storage.upload(segment, &options).await;
        UPLOADS_TOTAL
            .with_label_values(&["segment", result_label(&result)])
            .inc();

        match result {
            Ok(reference) => uploads.uploaded.push(reference),
            Err(e) if policy == SegmentFailurePolicy::Continue && !e.requires_out_of_band_fix() => {
                warn!(
                    group,
                    segment = %segment.display(),
                    error = %e,
                    "Segment upload failed, continuing"
                );
                uploads.failed.push(FailedSegment {
                    path: segment.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => {
                return Err(SegmentUploadError {
                    path: segment.clone(),
                    uploaded: uploads.uploaded.len(),
                    source: e,
                })
            }
        }
    }

    info!(
        group,
        uploaded = uploads.uploaded.len(),
        failed = uploads.failed.len(),
        "Segment uploads finished"
    );
    Ok(uploads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStorage;

    fn segments(n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| PathBuf::from(format!("/w/hls/segment{:03}.ts", i)))
            .collect()
    }

    #[test]
    fn test_playlist_caption() {
        assert_eq!(playlist_caption("clip.mp4"), "HLS: clip.mp4");
    }

    #[tokio::test]
    async fn test_segments_uploaded_in_order() {
        let storage = MockStorage::new();
        let result = upload_segments(&storage, &segments(3), "req", SegmentFailurePolicy::Abort)
            .await
            .unwrap();

        assert_eq!(result.uploaded.len(), 3);
        assert!(result.failed.is_empty());
        let names: Vec<_> = storage
            .uploads()
            .await
            .iter()
            .map(|u| u.file_name.clone())
            .collect();
        assert_eq!(names, vec!["segment000.ts", "segment001.ts", "segment002.ts"]);
    }

    #[tokio::test]
    async fn test_abort_stops_at_first_failure() {
        let storage = MockStorage::new();
        storage.fail_on("segment001.ts", StorageError::transient("timeout")).await;

        let err = upload_segments(&storage, &segments(3), "req", SegmentFailurePolicy::Abort)
            .await
            .unwrap_err();

        assert_eq!(err.uploaded, 1);
        assert!(err.path.ends_with("segment001.ts"));
        assert_eq!(storage.uploads().await.len(), 1);
    }

    #[tokio::test]
    async fn test_continue_records_failures() {
        let storage = MockStorage::new();
        storage.fail_on("segment001.ts", StorageError::transient("timeout")).await;

        let result = upload_segments(&storage, &segments(3), "req", SegmentFailurePolicy::Continue)
            .await
            .unwrap();

        assert_eq!(result.uploaded.len(), 2);
        assert_eq!(result.failed.len(), 1);
        assert!(result.failed[0].path.ends_with("segment001.ts"));
    }

    #[tokio::test]
    async fn test_permission_error_aborts_even_when_continuing() {
        let storage = MockStorage::new();
        storage
            .fail_on(
                "segment000.ts",
                StorageError::PermissionDenied {
                    destination: "chan".to_string(),
                    reason: "not enough rights".to_string(),
                },
            )
            .await;

        let err = upload_segments(&storage, &segments(3), "req", SegmentFailurePolicy::Continue)
            .await
            .unwrap_err();

        assert!(err.source.requires_out_of_band_fix());
        assert_eq!(err.uploaded, 0);
        assert!(storage.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn test_upload_primary_passes_caption() {
        let storage = MockStorage::new();
        let options = UploadOptions::new("req").with_caption(playlist_caption("a.mp4"));
        upload_primary(&storage, Path::new("/w/hls/index.m3u8"), &options, "playlist")
            .await
            .unwrap();

        let uploads = storage.uploads().await;
        assert_eq!(uploads[0].caption.as_deref(), Some("HLS: a.mp4"));
    }
}
