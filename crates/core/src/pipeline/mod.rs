//! Pipeline module for driving one media request end to end.
//!
//! A request moves through validation, download, conversion, upload and link
//! resolution while a single status message in the sender's chat follows
//! along. Every request ends in exactly one terminal state, and its
//! workspace is removed whatever the outcome.
//!
//! # Flow
//!
//! ```text
//! Received -> Validating -> Downloading -> Converting [-> ConvertingFallback]
//!          -> UploadingPlaylist -> UploadingSegments -> ResolvingLink -> Done
//!
//! any stage -> Error
//! ```
//!
//! With HLS disabled the conversion and segment stages are skipped and the
//! original file is uploaded as-is.

mod config;
mod error;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use runner::Pipeline;
pub use types::{OutcomeResult, PipelineOutcome};
