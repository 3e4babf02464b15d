//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

use super::fallback::FALLBACK_SEPARATOR;

/// Errors that can occur while producing HLS output.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory could not be prepared.
    #[error("Failed to prepare output directory: {path}")]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// FFmpeg exited with a non-zero status.
    #[error("FFmpeg exited with code {code:?}")]
    ProcessFailed { code: Option<i32>, output: String },

    /// FFmpeg ran past the wall-clock limit and was killed.
    #[error("Transcoding timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// FFmpeg succeeded but no playlist was written.
    #[error("Playlist not created: {path}")]
    PlaylistMissing { path: PathBuf },

    /// The playlist could not be parsed as a media playlist.
    #[error("Invalid playlist: {reason}")]
    PlaylistInvalid { reason: String },

    /// Playlist entries and segment files on disk disagree.
    #[error("Playlist lists {listed} segments but {on_disk} segment files exist")]
    PlaylistMismatch { listed: usize, on_disk: usize },

    /// Both the primary attempt and the re-encode fallback failed.
    #[error("Transcoding failed after fallback: {fallback}")]
    FallbackFailed {
        primary: Box<TranscoderError>,
        fallback: Box<TranscoderError>,
    },

    /// I/O error during transcoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscoderError {
    /// Creates a process failure carrying captured output.
    pub fn process_failed(code: Option<i32>, output: impl Into<String>) -> Self {
        Self::ProcessFailed {
            code,
            output: output.into(),
        }
    }

    /// Whether a re-encode attempt may fix this failure.
    ///
    /// Missing binaries or inputs fail the same way on every attempt.
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            Self::ProcessFailed { .. }
                | Self::Timeout { .. }
                | Self::PlaylistMissing { .. }
                | Self::PlaylistInvalid { .. }
                | Self::PlaylistMismatch { .. }
        )
    }

    /// Diagnostic text for the user, combining both attempts after a fallback.
    pub fn diagnostics(&self) -> String {
        match self {
            Self::ProcessFailed { output, .. } if !output.is_empty() => output.clone(),
            Self::FallbackFailed { primary, fallback } => format!(
                "{}\n{}\n{}",
                primary.diagnostics(),
                FALLBACK_SEPARATOR,
                fallback.diagnostics()
            ),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_eligibility() {
        assert!(TranscoderError::process_failed(Some(1), "bad codec").allows_fallback());
        assert!(TranscoderError::Timeout { timeout_secs: 5 }.allows_fallback());
        assert!(TranscoderError::PlaylistMismatch {
            listed: 3,
            on_disk: 2
        }
        .allows_fallback());
        assert!(!TranscoderError::FfmpegNotFound {
            path: PathBuf::from("ffmpeg")
        }
        .allows_fallback());
        assert!(!TranscoderError::InputNotFound {
            path: PathBuf::from("/in.mp4")
        }
        .allows_fallback());
    }

    #[test]
    fn test_diagnostics_combines_attempts() {
        let err = TranscoderError::FallbackFailed {
            primary: Box::new(TranscoderError::process_failed(Some(1), "copy failed")),
            fallback: Box::new(TranscoderError::process_failed(Some(1), "encode failed")),
        };
        let text = err.diagnostics();
        assert!(text.starts_with("copy failed"));
        assert!(text.contains(FALLBACK_SEPARATOR));
        assert!(text.ends_with("encode failed"));
    }

    #[test]
    fn test_diagnostics_falls_back_to_display() {
        let err = TranscoderError::Timeout { timeout_secs: 30 };
        assert_eq!(err.diagnostics(), "Transcoding timed out after 30 seconds");
    }
}
