//! Error types for the pipeline module.

use thiserror::Error;

use crate::request::DownloadError;
use crate::storage::StorageError;
use crate::transcoder::{truncate_output, TranscoderError};

/// Longest ffmpeg excerpt echoed back to the sender.
const USER_DIAGNOSTICS_LIMIT: usize = 1000;

/// Why a request ended in the error state.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Attachment is at or above the configured size limit.
    #[error("File too large: {size_bytes} bytes (limit {limit_mb} MB)")]
    FileTooLarge { size_bytes: u64, limit_mb: u64 },

    /// Message carries nothing the pipeline can process.
    #[error("Unsupported media: {reason}")]
    UnsupportedMedia { reason: String },

    /// Fetching the attachment failed.
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    /// The workspace could not be created.
    #[error("Workspace error: {0}")]
    Workspace(#[source] std::io::Error),

    /// Conversion failed, after the fallback where one was allowed.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] TranscoderError),

    /// Upload failed for a reason that may go away on its own.
    #[error("Upload failed: {0}")]
    Upload(#[source] StorageError),

    /// The destination refuses the bot; an operator has to fix it.
    #[error("Permission error: {source}")]
    Permission {
        remediation: String,
        #[source]
        source: StorageError,
    },

    /// The admission semaphore was closed.
    #[error("Pipeline is shutting down")]
    ShuttingDown,
}

impl PipelineError {
    /// Classifies a storage failure.
    pub fn from_storage(error: StorageError) -> Self {
        match error.remediation() {
            Some(remediation) if error.requires_out_of_band_fix() => Self::Permission {
                remediation,
                source: error,
            },
            _ => Self::Upload(error),
        }
    }

    /// Taxonomy bucket, used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileTooLarge { .. } | Self::UnsupportedMedia { .. } => "input",
            Self::Download(_) | Self::Workspace(_) | Self::Upload(_) | Self::ShuttingDown => {
                "transient"
            }
            Self::Conversion(_) => "conversion",
            Self::Permission { .. } => "permission",
        }
    }

    /// Text shown in the status message.
    ///
    /// Full detail goes to the log; this is the summary the sender sees.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileTooLarge { limit_mb, .. } => format!(
                "❌ File too large (> {} MB). Please send a smaller file.",
                limit_mb
            ),
            Self::UnsupportedMedia { reason } => format!(
                "❌ Unsupported media: {}. Send a video, an audio file or a document.",
                reason
            ),
            Self::Download(e) => format!("❌ Download failed: {}", e),
            Self::Workspace(_) => {
                "❌ Could not prepare a working directory. Please try again later.".to_string()
            }
            Self::Conversion(e) => format!(
                "❌ HLS conversion failed.\n\nffmpeg output:\n{}",
                truncate_output(&e.diagnostics(), USER_DIAGNOSTICS_LIMIT)
            ),
            Self::Upload(e @ StorageError::Rejected { .. }) => format!(
                "❌ Upload failed: {}. The destination will not accept this file.",
                e
            ),
            Self::Upload(e) => format!("❌ Upload failed: {}. Please try again.", e),
            Self::Permission {
                remediation,
                source,
            } => format!("❌ Channel issue: {}\n\n{}", source, remediation),
            Self::ShuttingDown => "❌ The bot is restarting. Please try again shortly.".to_string(),
        }
    }
}

impl From<StorageError> for PipelineError {
    fn from(error: StorageError) -> Self {
        Self::from_storage(error)
    }
}
