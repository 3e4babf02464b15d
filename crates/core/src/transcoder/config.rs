//! Configuration for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::TranscodeMode;

/// Configuration for the FFmpeg-based HLS transcoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Mode of the primary attempt. The fallback always re-encodes.
    #[serde(default)]
    pub mode: TranscodeMode,

    /// Target HLS segment duration in seconds.
    #[serde(default = "default_segment_secs")]
    pub segment_secs: u32,

    /// Wall-clock timeout for a single ffmpeg run in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum characters of captured ffmpeg output kept for diagnostics.
    #[serde(default = "default_output_limit")]
    pub output_limit: usize,

    /// File name of the generated playlist.
    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,

    /// File name prefix of generated segments (`<prefix>000.ts`, `<prefix>001.ts`, ...).
    #[serde(default = "default_segment_prefix")]
    pub segment_prefix: String,

    /// Encoder settings used in re-encode mode.
    #[serde(default)]
    pub reencode: ReencodeProfile,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional ffmpeg arguments inserted before the output.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,
}

/// Encoder settings for re-encode mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReencodeProfile {
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_crf")]
    pub crf: u8,
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate_kbps: u32,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_segment_secs() -> u32 {
    4
}

fn default_timeout() -> u64 {
    1800 // 30 minutes
}

fn default_output_limit() -> usize {
    1000
}

fn default_playlist_name() -> String {
    "index.m3u8".to_string()
}

fn default_segment_prefix() -> String {
    "segment".to_string()
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_preset() -> String {
    "veryfast".to_string()
}

fn default_crf() -> u8 {
    28
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> u32 {
    128
}

impl Default for ReencodeProfile {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            preset: default_preset(),
            crf: default_crf(),
            audio_codec: default_audio_codec(),
            audio_bitrate_kbps: default_audio_bitrate(),
        }
    }
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            mode: TranscodeMode::default(),
            segment_secs: default_segment_secs(),
            timeout_secs: default_timeout(),
            output_limit: default_output_limit(),
            playlist_name: default_playlist_name(),
            segment_prefix: default_segment_prefix(),
            reencode: ReencodeProfile::default(),
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
        }
    }
}

impl TranscoderConfig {
    /// Creates a new config with a custom ffmpeg path.
    pub fn with_ffmpeg_path(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ..Default::default()
        }
    }

    /// Sets the segment duration in seconds.
    pub fn with_segment_secs(mut self, secs: u32) -> Self {
        self.segment_secs = secs;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the primary mode.
    pub fn with_mode(mut self, mode: TranscodeMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranscoderConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.segment_secs, 4);
        assert_eq!(config.timeout_secs, 1800);
        assert_eq!(config.mode, TranscodeMode::Copy);
        assert_eq!(config.reencode.crf, 28);
    }

    #[test]
    fn test_config_builder() {
        let config = TranscoderConfig::with_ffmpeg_path(PathBuf::from("/usr/local/bin/ffmpeg"))
            .with_segment_secs(6)
            .with_timeout(60)
            .with_mode(TranscodeMode::Reencode);

        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.segment_secs, 6);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.mode, TranscodeMode::Reencode);
    }

    #[test]
    fn test_partial_reencode_profile_keeps_defaults() {
        let config: TranscoderConfig = toml::from_str(
            r#"
[reencode]
crf = 23
"#,
        )
        .unwrap();
        assert_eq!(config.reencode.crf, 23);
        assert_eq!(config.reencode.preset, "veryfast");
        assert_eq!(config.playlist_name, "index.m3u8");
    }
}
