//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::config::TranscoderConfig;
use super::error::TranscoderError;
use super::playlist::{collect_segments, verify_playlist};
use super::traits::Transcoder;
use super::types::{truncate_output, HlsJob, HlsOutput, TranscodeMode};

/// FFmpeg-based HLS transcoder.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Builds ffmpeg arguments for one HLS run.
    fn build_args(&self, input_path: &Path, output_dir: &Path, mode: TranscodeMode) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];

        match mode {
            TranscodeMode::Copy => {
                args.extend(["-c".to_string(), "copy".to_string()]);
            }
            TranscodeMode::Reencode => {
                let profile = &self.config.reencode;
                args.extend([
                    "-c:v".to_string(),
                    profile.video_codec.clone(),
                    "-preset".to_string(),
                    profile.preset.clone(),
                    "-crf".to_string(),
                    profile.crf.to_string(),
                    "-c:a".to_string(),
                    profile.audio_codec.clone(),
                    "-b:a".to_string(),
                    format!("{}k", profile.audio_bitrate_kbps),
                ]);
            }
        }

        let segment_pattern = output_dir.join(format!("{}%03d.ts", self.config.segment_prefix));
        args.extend([
            "-start_number".to_string(),
            "0".to_string(),
            "-hls_time".to_string(),
            self.config.segment_secs.to_string(),
            "-hls_list_size".to_string(),
            "0".to_string(),
            "-hls_segment_filename".to_string(),
            segment_pattern.to_string_lossy().to_string(),
            "-f".to_string(),
            "hls".to_string(),
        ]);

        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(
            output_dir
                .join(&self.config.playlist_name)
                .to_string_lossy()
                .to_string(),
        );

        args
    }

    /// Empties and recreates the output directory so a retry never sees stale segments.
    async fn prepare_output_dir(dir: &Path) -> Result<(), TranscoderError> {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(TranscoderError::OutputDirectoryFailed {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| TranscoderError::OutputDirectoryFailed {
                path: dir.to_path_buf(),
                source,
            })
    }

    fn spawn_error(&self, e: std::io::Error) -> TranscoderError {
        if e.kind() == std::io::ErrorKind::NotFound {
            TranscoderError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            TranscoderError::Io(e)
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn primary_mode(&self) -> TranscodeMode {
        self.config.mode
    }

    async fn transcode(&self, job: HlsJob) -> Result<HlsOutput, TranscoderError> {
        let start = Instant::now();

        if !job.input_path.exists() {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        Self::prepare_output_dir(&job.output_dir).await?;

        let args = self.build_args(&job.input_path, &job.output_dir, job.mode);
        debug!(job_id = %job.job_id, mode = %job.mode, ?args, "Running ffmpeg");

        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(job_id = %job.job_id, timeout_secs = self.config.timeout_secs, "ffmpeg timed out");
                return Err(TranscoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            let combined = format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(TranscoderError::process_failed(
                output.status.code(),
                truncate_output(&combined, self.config.output_limit),
            ));
        }

        let playlist = job.output_dir.join(&self.config.playlist_name);
        let segments = collect_segments(&job.output_dir).await?;
        verify_playlist(&playlist, &segments).await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            job_id = %job.job_id,
            mode = %job.mode,
            segments = segments.len(),
            duration_ms,
            "HLS output ready"
        );

        Ok(HlsOutput {
            job_id: job.job_id,
            playlist,
            segments,
            mode: job.mode,
            duration_ms,
        })
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(TranscoderError::process_failed(
                output.status.code(),
                truncate_output(
                    &String::from_utf8_lossy(&output.stderr),
                    self.config.output_limit,
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_build_args_copy_mode() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let args = transcoder.build_args(
            Path::new("/work/in.mp4"),
            Path::new("/work/hls"),
            TranscodeMode::Copy,
        );

        assert_eq!(value_after(&args, "-i"), Some("/work/in.mp4"));
        assert_eq!(value_after(&args, "-c"), Some("copy"));
        assert_eq!(value_after(&args, "-hls_time"), Some("4"));
        assert_eq!(value_after(&args, "-hls_list_size"), Some("0"));
        assert_eq!(value_after(&args, "-start_number"), Some("0"));
        assert_eq!(
            value_after(&args, "-hls_segment_filename"),
            Some("/work/hls/segment%03d.ts")
        );
        assert_eq!(value_after(&args, "-f"), Some("hls"));
        assert_eq!(args.last().map(String::as_str), Some("/work/hls/index.m3u8"));
        assert!(!args.contains(&"-c:v".to_string()));
    }

    #[test]
    fn test_build_args_reencode_mode() {
        let config = TranscoderConfig::default().with_segment_secs(6);
        let transcoder = FfmpegTranscoder::new(config);
        let args = transcoder.build_args(
            Path::new("/work/in.mkv"),
            Path::new("/work/hls"),
            TranscodeMode::Reencode,
        );

        assert_eq!(value_after(&args, "-c:v"), Some("libx264"));
        assert_eq!(value_after(&args, "-preset"), Some("veryfast"));
        assert_eq!(value_after(&args, "-crf"), Some("28"));
        assert_eq!(value_after(&args, "-c:a"), Some("aac"));
        assert_eq!(value_after(&args, "-b:a"), Some("128k"));
        assert_eq!(value_after(&args, "-hls_time"), Some("6"));
        assert!(!args.contains(&"copy".to_string()));
    }

    #[test]
    fn test_build_args_extra_args_before_output() {
        let mut config = TranscoderConfig::default();
        config.extra_ffmpeg_args = vec!["-threads".to_string(), "2".to_string()];
        let transcoder = FfmpegTranscoder::new(config);
        let args = transcoder.build_args(
            Path::new("/in.mp4"),
            Path::new("/out"),
            TranscodeMode::Copy,
        );
        let n = args.len();
        assert_eq!(&args[n - 3..n - 1], &["-threads".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_transcode_missing_input() {
        let dir = TempDir::new().unwrap();
        let transcoder = FfmpegTranscoder::with_defaults();
        let job = HlsJob {
            job_id: "missing".to_string(),
            input_path: dir.path().join("nope.mp4"),
            output_dir: dir.path().join("hls"),
            mode: TranscodeMode::Copy,
        };
        let err = transcoder.transcode(job).await.unwrap_err();
        assert!(matches!(err, TranscoderError::InputNotFound { .. }));
        assert!(!err.allows_fallback());
    }

    #[tokio::test]
    async fn test_transcode_binary_not_found() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"not really a video").unwrap();

        let transcoder = FfmpegTranscoder::new(TranscoderConfig::with_ffmpeg_path(
            PathBuf::from("/nonexistent/bin/ffmpeg"),
        ));
        let job = HlsJob {
            job_id: "nobin".to_string(),
            input_path: input.clone(),
            output_dir: dir.path().join("hls"),
            mode: TranscodeMode::Copy,
        };
        let err = transcoder.transcode(job).await.unwrap_err();
        assert!(matches!(err, TranscoderError::FfmpegNotFound { .. }));
        assert_eq!(std::fs::read(&input).unwrap(), b"not really a video");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_transcode_nonzero_exit_is_process_failure() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"data").unwrap();

        // `false` ignores its arguments and exits with status 1.
        let transcoder =
            FfmpegTranscoder::new(TranscoderConfig::with_ffmpeg_path(PathBuf::from("false")));
        let job = HlsJob {
            job_id: "fails".to_string(),
            input_path: input,
            output_dir: dir.path().join("hls"),
            mode: TranscodeMode::Copy,
        };
        let err = transcoder.transcode(job).await.unwrap_err();
        assert!(matches!(
            err,
            TranscoderError::ProcessFailed { code: Some(1), .. }
        ));
        assert!(err.allows_fallback());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_transcode_timeout_kills_process() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"data").unwrap();

        // Stands in for an ffmpeg that hangs; the marker only appears if
        // the process outlives the timeout.
        let marker = dir.path().join("still-running");
        let script = dir.path().join("slow-ffmpeg.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nsleep 3\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let transcoder =
            FfmpegTranscoder::new(TranscoderConfig::with_ffmpeg_path(script).with_timeout(1));
        let job = HlsJob {
            job_id: "hangs".to_string(),
            input_path: input,
            output_dir: dir.path().join("hls"),
            mode: TranscodeMode::Copy,
        };

        let start = std::time::Instant::now();
        let err = transcoder.transcode(job).await.unwrap_err();
        assert!(matches!(err, TranscoderError::Timeout { timeout_secs: 1 }));
        assert!(start.elapsed() < Duration::from_secs(3));
        assert!(err.allows_fallback());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_prepare_output_dir_clears_stale_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("hls");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("segment000.ts"), b"stale").unwrap();

        FfmpegTranscoder::prepare_output_dir(&out).await.unwrap();
        assert!(out.exists());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
