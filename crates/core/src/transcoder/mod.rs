//! Transcoder module for repackaging media as HTTP Live Streaming.
//!
//! This module provides the `Transcoder` trait and an FFmpeg implementation
//! that turns one input file into a playlist plus an ordered set of segment
//! files inside an output directory.
//!
//! # Features
//!
//! - Stream-copy mode (fast) and re-encode mode (compatible)
//! - Single re-encode fallback when the primary attempt fails
//! - Wall-clock timeout around the ffmpeg subprocess
//! - Playlist/segment consistency check after every run
//!
//! # Example
//!
//! ```ignore
//! use hls_relay_core::transcoder::{FfmpegTranscoder, HlsJob, TranscodeMode, Transcoder};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//! transcoder.validate().await?;
//!
//! let job = HlsJob {
//!     job_id: "job-1".to_string(),
//!     input_path: PathBuf::from("/tmp/work/download/clip.mp4"),
//!     output_dir: PathBuf::from("/tmp/work/hls"),
//!     mode: TranscodeMode::Copy,
//! };
//!
//! let output = transcoder.transcode(job).await?;
//! println!("{} segments", output.segments.len());
//! ```

mod config;
mod error;
mod fallback;
mod ffmpeg;
mod playlist;
mod traits;
mod types;

pub use config::{ReencodeProfile, TranscoderConfig};
pub use error::TranscoderError;
pub use fallback::{transcode_with_fallback, FallbackOutcome, FALLBACK_SEPARATOR};
pub use ffmpeg::FfmpegTranscoder;
pub use playlist::{collect_segments, playlist_segment_names, verify_playlist};
pub use traits::Transcoder;
pub use types::{truncate_output, HlsJob, HlsOutput, TranscodeMode};
