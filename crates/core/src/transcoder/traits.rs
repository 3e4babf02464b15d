//! Trait definitions for the transcoder module.

use async_trait::async_trait;

use super::error::TranscoderError;
use super::types::{HlsJob, HlsOutput, TranscodeMode};

/// A transcoder that can repackage a media file as HLS.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Mode used for the first attempt of a request.
    fn primary_mode(&self) -> TranscodeMode {
        TranscodeMode::Copy
    }

    /// Produces a playlist and segments in `job.output_dir`.
    ///
    /// On success the output directory holds exactly the files listed in the
    /// returned `HlsOutput`, and the playlist references the segments in order.
    async fn transcode(&self, job: HlsJob) -> Result<HlsOutput, TranscoderError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscoderError>;
}
