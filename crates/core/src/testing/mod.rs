//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of every collaborator the
//! pipeline talks to, allowing full request runs without Telegram, ffmpeg
//! or an object store.
//!
//! # Example
//!
//! ```rust,ignore
//! use hls_relay_core::testing::{MockSource, MockStatusSink, MockStorage, MockTranscoder};
//!
//! let storage = MockStorage::new();
//! let transcoder = MockTranscoder::new().with_segment_count(5);
//!
//! // Configure failures
//! storage.fail_on("segment002.ts", StorageError::transient("timeout")).await;
//!
//! // Build a Pipeline from the mocks...
//! ```

mod mock_source;
mod mock_status_sink;
mod mock_storage;
mod mock_transcoder;

pub use mock_source::MockSource;
pub use mock_status_sink::{MockStatusSink, RecordedStatus};
pub use mock_storage::{MockStorage, RecordedUpload};
pub use mock_transcoder::MockTranscoder;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::request::{MediaKind, MediaRequest};

    const MB: u64 = 1024 * 1024;

    /// Create a video request from chat 42 with the given size.
    pub fn video_request(file_name: &str, size_bytes: u64) -> MediaRequest {
        MediaRequest::new(
            42,
            format!("file-id-{}", file_name),
            Some(file_name.to_string()),
            size_bytes,
            MediaKind::Video,
        )
    }

    /// Create a video request of `size_mb` megabytes.
    pub fn video_request_mb(file_name: &str, size_mb: u64) -> MediaRequest {
        video_request(file_name, size_mb * MB)
    }

    /// Create a document request without a file name.
    pub fn unnamed_document(size_bytes: u64) -> MediaRequest {
        MediaRequest::new(42, "file-id-doc", None, size_bytes, MediaKind::Document)
    }
}
