//! Request pipeline implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error, info, warn};

use crate::link::{LinkError, LinkResolver, ResultLink};
use crate::metrics::{
    JOBS_IN_FLIGHT, REQUESTS_TOTAL, REQUEST_DURATION, REQUEST_FAILURES, TRANSCODE_ATTEMPTS,
    TRANSCODE_DURATION,
};
use crate::progress::{ProgressReporter, Stage, StatusSink};
use crate::request::{MediaRequest, MediaSource};
use crate::storage::{Storage, UploadOptions};
use crate::transcoder::{
    transcode_with_fallback, FallbackOutcome, HlsJob, TranscodeMode, Transcoder, TranscoderError,
};
use crate::uploader::{playlist_caption, upload_primary, upload_segments, UploadReport};
use crate::workspace::Workspace;

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::types::{caveat_message, success_message, OutcomeResult, PipelineOutcome};

/// Status text while the original file is uploaded without conversion.
const UPLOADING_ORIGINAL_TEXT: &str = "Uploading file… ☁️";

/// Where and why a run stopped.
struct Failure {
    stage: Stage,
    error: PipelineError,
}

impl Failure {
    fn new(stage: Stage, error: PipelineError) -> Self {
        Self { stage, error }
    }

    fn at<E: Into<PipelineError>>(stage: Stage) -> impl FnOnce(E) -> Self {
        move |e| Self::new(stage, e.into())
    }
}

/// What a run that reached storage produced.
struct Delivered {
    report: UploadReport,
    size_bytes: u64,
    converted: bool,
    link: Result<ResultLink, LinkError>,
}

/// Keeps the in-flight gauge accurate on every exit path.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        JOBS_IN_FLIGHT.inc();
        Self
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        JOBS_IN_FLIGHT.dec();
    }
}

/// Runs media requests from download to final status message.
///
/// Collaborators are trait objects so the pipeline can be driven by the
/// Telegram adapters in production and by mocks in tests. Each call to
/// [`Pipeline::handle`] is independent; the only shared state is the
/// optional admission semaphore.
pub struct Pipeline {
    config: PipelineConfig,
    source: Arc<dyn MediaSource>,
    transcoder: Arc<dyn Transcoder>,
    storage: Arc<dyn Storage>,
    links: Arc<dyn LinkResolver>,
    status: Arc<dyn StatusSink>,
    admission: Option<Arc<Semaphore>>,
}

impl Pipeline {
    /// Creates a new pipeline.
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn MediaSource>,
        transcoder: Arc<dyn Transcoder>,
        storage: Arc<dyn Storage>,
        links: Arc<dyn LinkResolver>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let admission = (config.max_concurrent_jobs > 0)
            .then(|| Arc::new(Semaphore::new(config.max_concurrent_jobs)));
        Self {
            config,
            source,
            transcoder,
            storage,
            links,
            status,
            admission,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Free admission permits, or `None` when admission is unbounded.
    pub fn available_permits(&self) -> Option<usize> {
        self.admission.as_ref().map(|s| s.available_permits())
    }

    /// Handles one request to a terminal state.
    ///
    /// Never fails: every error ends up in the outcome and the status message.
    pub async fn handle(&self, request: MediaRequest) -> PipelineOutcome {
        let start = Instant::now();
        info!(
            request_id = %request.id,
            chat_id = request.chat_id,
            file_name = %request.file_name,
            size_bytes = request.size_bytes,
            kind = %request.kind,
            "Request received"
        );

        let mut reporter = ProgressReporter::start(Arc::clone(&self.status), request.chat_id).await;

        let (result, final_text) = match self.run(&request, &mut reporter).await {
            Ok(Delivered {
                report,
                size_bytes,
                converted,
                link: Ok(link),
            }) => {
                info!(request_id = %request.id, %link, segments = report.segments.len(), "Request done");
                let text = success_message(&request, size_bytes, &link, &report, converted);
                (OutcomeResult::Done { link, report }, text)
            }
            Ok(Delivered {
                report,
                link: Err(e),
                ..
            }) => {
                warn!(request_id = %request.id, error = %e, "Uploaded but link resolution failed");
                let caveat = e.to_string();
                let text = caveat_message(&request, &report, &caveat);
                (OutcomeResult::DoneWithCaveat { report, caveat }, text)
            }
            Err(Failure { stage, error }) => {
                error!(
                    request_id = %request.id,
                    stage = %stage,
                    kind = error.kind(),
                    error = %error,
                    "Request failed"
                );
                if let PipelineError::Conversion(ref e) = error {
                    debug!(request_id = %request.id, output = %e.diagnostics(), "ffmpeg diagnostics");
                }
                REQUEST_FAILURES.with_label_values(&[stage.as_str()]).inc();
                let text = error.user_message();
                (OutcomeResult::Failed { stage, error }, text)
            }
        };

        let terminal = match result {
            OutcomeResult::Failed { .. } => Stage::Error,
            _ => Stage::Done,
        };
        reporter.finish(terminal, &final_text).await;

        let elapsed = start.elapsed();
        REQUESTS_TOTAL.with_label_values(&[result.label()]).inc();
        REQUEST_DURATION
            .with_label_values(&[result.label()])
            .observe(elapsed.as_secs_f64());

        PipelineOutcome {
            request_id: request.id.clone(),
            stages: reporter.history().to_vec(),
            result,
            final_text,
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    async fn run(
        &self,
        request: &MediaRequest,
        reporter: &mut ProgressReporter,
    ) -> Result<Delivered, Failure> {
        reporter.advance(Stage::Validating).await;
        self.validate(request)
            .await
            .map_err(Failure::at(Stage::Validating))?;

        reporter.advance(Stage::Downloading).await;
        let workspace = Workspace::create(&self.config.temp_dir, &request.id)
            .await
            .map_err(|e| Failure::new(Stage::Downloading, PipelineError::Workspace(e)))?;

        let result = self.process(request, &workspace, reporter).await;
        workspace.cleanup().await;
        result
    }

    /// Input checks that need no download.
    async fn validate(&self, request: &MediaRequest) -> Result<(), PipelineError> {
        // 0 means the sender did not report a size.
        if request.size_bytes > 0 && request.size_bytes >= self.config.max_file_size_bytes() {
            return Err(PipelineError::FileTooLarge {
                size_bytes: request.size_bytes,
                limit_mb: self.config.max_file_size_mb,
            });
        }
        self.storage.check_access().await?;
        Ok(())
    }

    async fn process(
        &self,
        request: &MediaRequest,
        workspace: &Workspace,
        reporter: &mut ProgressReporter,
    ) -> Result<Delivered, Failure> {
        let input = workspace.download_path(&request.file_name);
        let downloaded = self
            .source
            .download(request, &input)
            .await
            .map_err(Failure::at(Stage::Downloading))?;
        info!(
            request_id = %request.id,
            source = self.source.name(),
            bytes = downloaded,
            "Download complete"
        );
        let size_bytes = if request.size_bytes > 0 {
            request.size_bytes
        } else {
            downloaded
        };

        let (report, converted) = {
            let _permit = self.admit().await.map_err(Failure::at(reporter.stage()))?;
            let _in_flight = InFlight::enter();

            if self.config.enable_hls {
                let report = self
                    .convert_and_upload(request, workspace, &input, reporter)
                    .await?;
                (report, true)
            } else {
                (self.upload_original(request, &input, reporter).await?, false)
            }
        };

        reporter.advance(Stage::ResolvingLink).await;
        let link = self
            .links
            .resolve(self.storage.as_ref(), &report.primary)
            .await;

        Ok(Delivered {
            report,
            size_bytes,
            converted,
            link,
        })
    }

    async fn admit(&self) -> Result<Option<OwnedSemaphorePermit>, PipelineError> {
        match self.admission {
            Some(ref semaphore) => {
                let permit = Arc::clone(semaphore)
                    .acquire_owned()
                    .await
                    .map_err(|_| PipelineError::ShuttingDown)?;
                Ok(Some(permit))
            }
            None => Ok(None),
        }
    }

    async fn convert_and_upload(
        &self,
        request: &MediaRequest,
        workspace: &Workspace,
        input: &Path,
        reporter: &mut ProgressReporter,
    ) -> Result<UploadReport, Failure> {
        reporter.advance(Stage::Converting).await;
        let primary_mode = self.transcoder.primary_mode();
        let job = HlsJob {
            job_id: request.id.clone(),
            input_path: input.to_path_buf(),
            output_dir: workspace.hls_dir(),
            mode: primary_mode,
        };

        let started = Instant::now();
        let announce = &mut *reporter;
        let converted = transcode_with_fallback(self.transcoder.as_ref(), job, |_| async move {
            announce.fallback().await
        })
        .await;
        record_transcode(primary_mode, &converted, started);
        let output = converted.map_err(Failure::at(reporter.stage()))?.output;

        reporter.advance(Stage::UploadingPlaylist).await;
        let options =
            UploadOptions::new(&request.id).with_caption(playlist_caption(&request.file_name));
        let primary = upload_primary(self.storage.as_ref(), &output.playlist, &options, "playlist")
            .await
            .map_err(Failure::at(Stage::UploadingPlaylist))?;

        let mut report = UploadReport::single(primary);
        if output.segments.is_empty() {
            return Ok(report);
        }

        reporter.advance(Stage::UploadingSegments).await;
        let uploads = upload_segments(
            self.storage.as_ref(),
            &output.segments,
            &request.id,
            self.config.segment_failure_policy,
        )
        .await
        .map_err(|e| {
            warn!(
                request_id = %request.id,
                segment = %e.path.display(),
                uploaded = e.uploaded,
                "Segment upload aborted"
            );
            Failure::new(Stage::UploadingSegments, PipelineError::from_storage(e.source))
        })?;

        report.segments = uploads.uploaded;
        report.failed_segments = uploads.failed;
        Ok(report)
    }

    async fn upload_original(
        &self,
        request: &MediaRequest,
        input: &Path,
        reporter: &mut ProgressReporter,
    ) -> Result<UploadReport, Failure> {
        reporter
            .advance_with_text(Stage::UploadingPlaylist, UPLOADING_ORIGINAL_TEXT)
            .await;
        let options = UploadOptions::new(&request.id).with_caption(request.file_name.clone());
        let primary = upload_primary(self.storage.as_ref(), input, &options, "original")
            .await
            .map_err(Failure::at(Stage::UploadingPlaylist))?;
        Ok(UploadReport::single(primary))
    }
}

/// Counts each ffmpeg run the fallback wrapper made.
fn record_transcode(
    primary: TranscodeMode,
    result: &Result<FallbackOutcome, TranscoderError>,
    started: Instant,
) {
    let runs: Vec<(TranscodeMode, &str)> = match result {
        Ok(outcome) if !outcome.used_fallback() => vec![(primary, "success")],
        Ok(_) => vec![(primary, "failed"), (TranscodeMode::Reencode, "success")],
        Err(TranscoderError::FallbackFailed { .. }) => {
            vec![(primary, "failed"), (TranscodeMode::Reencode, "failed")]
        }
        Err(_) => vec![(primary, "failed")],
    };
    for &(mode, outcome) in &runs {
        TRANSCODE_ATTEMPTS
            .with_label_values(&[mode.as_str(), outcome])
            .inc();
    }
    TRANSCODE_DURATION
        .with_label_values(&[&runs.len().to_string()])
        .observe(started.elapsed().as_secs_f64());
}
