//! Types for the transcoder module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How ffmpeg treats the input streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscodeMode {
    /// Copy codecs into the HLS container (fast, fails on incompatible codecs).
    #[default]
    Copy,
    /// Re-encode to H.264/AAC (slow, broadly compatible).
    Reencode,
}

impl TranscodeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Reencode => "reencode",
        }
    }
}

impl fmt::Display for TranscodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcoder invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct HlsJob {
    /// Job identifier, used for logging.
    pub job_id: String,
    /// Input media file. Never modified.
    pub input_path: PathBuf,
    /// Directory receiving the playlist and segments.
    pub output_dir: PathBuf,
    /// Stream handling mode.
    pub mode: TranscodeMode,
}

impl HlsJob {
    /// Same job with a different mode.
    pub fn with_mode(&self, mode: TranscodeMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

/// Result of a successful transcoder run.
#[derive(Debug, Clone, PartialEq)]
pub struct HlsOutput {
    /// Job identifier.
    pub job_id: String,
    /// Generated playlist.
    pub playlist: PathBuf,
    /// Segment files in playback order.
    pub segments: Vec<PathBuf>,
    /// Mode that produced this output.
    pub mode: TranscodeMode,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

/// Keeps the last `limit` characters of process output.
///
/// ffmpeg prints the actual error last, so the tail is what matters.
pub fn truncate_output(output: &str, limit: usize) -> String {
    let trimmed = output.trim();
    let count = trimmed.chars().count();
    if count <= limit {
        return trimmed.to_string();
    }
    let tail: String = trimmed.chars().skip(count - limit).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&TranscodeMode::Reencode).unwrap(),
            "\"reencode\""
        );
        let mode: TranscodeMode = serde_json::from_str("\"copy\"").unwrap();
        assert_eq!(mode, TranscodeMode::Copy);
    }

    #[test]
    fn test_truncate_output_keeps_tail() {
        assert_eq!(truncate_output("  short\n", 100), "short");

        let long = format!("{}Error: codec not supported", "x".repeat(50));
        let truncated = truncate_output(&long, 26);
        assert_eq!(truncated, "...Error: codec not supported");
    }

    #[test]
    fn test_truncate_output_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate_output(&text, 3), "...ééé");
    }
}
