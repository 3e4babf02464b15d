//! Types for the pipeline module.

use crate::link::ResultLink;
use crate::progress::Stage;
use crate::request::MediaRequest;
use crate::uploader::UploadReport;

use super::error::PipelineError;

/// How a request ended.
#[derive(Debug)]
pub enum OutcomeResult {
    /// Everything uploaded and a link was produced.
    Done {
        link: ResultLink,
        report: UploadReport,
    },
    /// Uploaded, but the link could not be produced.
    DoneWithCaveat { report: UploadReport, caveat: String },
    /// The request stopped at `stage`.
    Failed { stage: Stage, error: PipelineError },
}

impl OutcomeResult {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Done { .. } => "done",
            Self::DoneWithCaveat { .. } => "done_with_caveat",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn report(&self) -> Option<&UploadReport> {
        match self {
            Self::Done { report, .. } | Self::DoneWithCaveat { report, .. } => Some(report),
            Self::Failed { .. } => None,
        }
    }
}

/// Result of handling one request.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub request_id: String,
    /// Stages entered, in order, ending with exactly one terminal stage.
    pub stages: Vec<Stage>,
    pub result: OutcomeResult,
    /// Text the status message was left showing.
    pub final_text: String,
    pub duration_ms: u64,
}

impl PipelineOutcome {
    /// `Done` for both success variants, `Error` otherwise.
    pub fn final_stage(&self) -> Stage {
        match self.result {
            OutcomeResult::Failed { .. } => Stage::Error,
            _ => Stage::Done,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.result, OutcomeResult::Failed { .. })
    }

    pub fn link(&self) -> Option<&ResultLink> {
        match &self.result {
            OutcomeResult::Done { link, .. } => Some(link),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.result {
            OutcomeResult::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Size shown to the user, in megabytes with two decimals.
fn size_mb(size_bytes: u64) -> String {
    format!("{:.2}", size_bytes as f64 / (1024.0 * 1024.0))
}

fn failed_segments_line(report: &UploadReport) -> String {
    if report.is_complete() {
        String::new()
    } else {
        format!(
            "⚠️ {} segment(s) failed to upload; playback may stop early.\n\n",
            report.failed_segments.len()
        )
    }
}

/// Final message for a completed request.
pub(crate) fn success_message(
    request: &MediaRequest,
    size_bytes: u64,
    link: &ResultLink,
    report: &UploadReport,
    converted: bool,
) -> String {
    if !converted {
        return format!(
            "Upload Complete! 🚀\n\n🎥 Original: {}\n📦 Size: {} MB\n\n🔗 Link:\n{}",
            request.file_name,
            size_mb(size_bytes),
            link
        );
    }
    format!(
        "HLS Conversion Complete! 🚀\n\n\
         🎥 Original: {}\n\
         📦 Size: {} MB\n\n\
         📺 Playlist (.m3u8):\n{}\n\n\
         🔢 Segments uploaded: {}\n\n\
         {}\
         Play the playlist URL with any HLS player (VLC, Video.js, ExoPlayer).",
        request.file_name,
        size_mb(size_bytes),
        link,
        report.segments.len(),
        failed_segments_line(report),
    )
}

/// Final message when the upload went through but no link could be made.
pub(crate) fn caveat_message(request: &MediaRequest, report: &UploadReport, caveat: &str) -> String {
    let mut text = format!(
        "⚠️ Uploaded but failed to get CDN link: {}\n\n🎥 Original: {}",
        caveat, request.file_name
    );
    if !report.segments.is_empty() {
        text.push_str(&format!("\n🔢 Segments uploaded: {}", report.segments.len()));
    }
    text
}
