//! Mock transcoder for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transcoder::{HlsJob, HlsOutput, TranscodeMode, Transcoder, TranscoderError};

/// Mock implementation of the Transcoder trait.
///
/// Writes a real playlist and segment files into the job's output directory,
/// so everything downstream (segment collection, uploads, cleanup) sees the
/// same layout ffmpeg would leave behind.
///
/// # Example
///
/// ```rust,ignore
/// use hls_relay_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::new().with_segment_count(12);
///
/// // First attempt fails, the re-encode fallback succeeds
/// transcoder.push_error(TranscoderError::process_failed(Some(1), "codec")).await;
///
/// let modes = transcoder.recorded_modes().await;
/// ```
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    segment_count: usize,
    jobs: Arc<RwLock<Vec<HlsJob>>>,
    /// Errors returned by the next calls, oldest first.
    errors: Arc<RwLock<VecDeque<TranscoderError>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a mock transcoder producing three segments.
    pub fn new() -> Self {
        Self {
            segment_count: 3,
            jobs: Arc::new(RwLock::new(Vec::new())),
            errors: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    /// Number of segments each successful run writes.
    pub fn with_segment_count(mut self, count: usize) -> Self {
        self.segment_count = count;
        self
    }

    /// Queue an error for the next unscripted call.
    pub async fn push_error(&self, error: TranscoderError) {
        self.errors.write().await.push_back(error);
    }

    /// Modes of all jobs received, in order.
    pub async fn recorded_modes(&self) -> Vec<TranscodeMode> {
        self.jobs.read().await.iter().map(|j| j.mode).collect()
    }

    /// Get the number of transcode calls.
    pub async fn call_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn write_output(&self, job: &HlsJob) -> Result<HlsOutput, TranscoderError> {
        match tokio::fs::remove_dir_all(&job.output_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(&job.output_dir).await?;

        let mut playlist = String::from(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:0\n",
        );
        let mut segments = Vec::with_capacity(self.segment_count);
        for i in 0..self.segment_count {
            let name = format!("segment{:03}.ts", i);
            let path = job.output_dir.join(&name);
            tokio::fs::write(&path, format!("ts-{}", i)).await?;
            playlist.push_str(&format!("#EXTINF:10.000000,\n{}\n", name));
            segments.push(path);
        }
        playlist.push_str("#EXT-X-ENDLIST\n");

        let playlist_path = job.output_dir.join("index.m3u8");
        tokio::fs::write(&playlist_path, playlist).await?;

        Ok(HlsOutput {
            job_id: job.job_id.clone(),
            playlist: playlist_path,
            segments,
            mode: job.mode,
            duration_ms: 1,
        })
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcode(&self, job: HlsJob) -> Result<HlsOutput, TranscoderError> {
        self.jobs.write().await.push(job.clone());

        if let Some(err) = self.errors.write().await.pop_front() {
            return Err(err);
        }
        self.write_output(&job).await
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::verify_playlist;
    use tempfile::TempDir;

    fn job(temp: &TempDir) -> HlsJob {
        HlsJob {
            job_id: "job-1".to_string(),
            input_path: temp.path().join("in.mp4"),
            output_dir: temp.path().join("hls"),
            mode: TranscodeMode::Copy,
        }
    }

    #[tokio::test]
    async fn test_output_is_consistent() {
        let temp = TempDir::new().unwrap();
        let transcoder = MockTranscoder::new().with_segment_count(4);

        let output = transcoder.transcode(job(&temp)).await.unwrap();
        assert_eq!(output.segments.len(), 4);
        verify_playlist(&output.playlist, &output.segments)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_scripted_errors_are_consumed_in_order() {
        let temp = TempDir::new().unwrap();
        let transcoder = MockTranscoder::new();
        transcoder
            .push_error(TranscoderError::Timeout { timeout_secs: 1 })
            .await;

        assert!(transcoder.transcode(job(&temp)).await.is_err());
        assert!(transcoder.transcode(job(&temp)).await.is_ok());
        assert_eq!(transcoder.call_count().await, 2);
    }
}
