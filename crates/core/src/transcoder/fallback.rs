//! Primary attempt plus a single re-encode fallback.

use std::future::Future;
use tracing::{info, warn};

use super::error::TranscoderError;
use super::traits::Transcoder;
use super::types::{HlsJob, HlsOutput, TranscodeMode};

/// Line separating primary and fallback diagnostics.
pub const FALLBACK_SEPARATOR: &str = "FALLBACK:";

/// Successful output together with the number of ffmpeg runs it took.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    pub output: HlsOutput,
    /// 1 when the primary attempt succeeded, 2 after a fallback.
    pub attempts: u32,
}

impl FallbackOutcome {
    pub fn used_fallback(&self) -> bool {
        self.attempts > 1
    }
}

/// Runs `job` and, if it fails in a way a re-encode could fix, runs it once
/// more in [`TranscodeMode::Reencode`].
///
/// `before_fallback` is awaited between the attempts, with the primary error.
/// It is not called when no fallback happens.
pub async fn transcode_with_fallback<F, Fut>(
    transcoder: &dyn Transcoder,
    job: HlsJob,
    before_fallback: F,
) -> Result<FallbackOutcome, TranscoderError>
where
    F: FnOnce(&TranscoderError) -> Fut,
    Fut: Future<Output = ()>,
{
    let fallback_job = job.with_mode(TranscodeMode::Reencode);

    let primary = match transcoder.transcode(job).await {
        Ok(output) => {
            return Ok(FallbackOutcome {
                output,
                attempts: 1,
            })
        }
        Err(e) => e,
    };

    if !primary.allows_fallback() {
        return Err(primary);
    }

    warn!(
        job_id = %fallback_job.job_id,
        transcoder = transcoder.name(),
        error = %primary,
        "Primary transcode failed, retrying with re-encode"
    );
    before_fallback(&primary).await;

    match transcoder.transcode(fallback_job).await {
        Ok(output) => {
            info!(job_id = %output.job_id, "Re-encode fallback succeeded");
            Ok(FallbackOutcome {
                output,
                attempts: 2,
            })
        }
        Err(fallback) => Err(TranscoderError::FallbackFailed {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }),
    }
}
