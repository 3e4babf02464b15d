pub mod config;
pub mod link;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod request;
pub mod storage;
pub mod telegram;
pub mod testing;
pub mod transcoder;
pub mod uploader;
pub mod workspace;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use link::{create_link_resolver, LinkResolver, LinkStrategy, ResultLink};
pub use pipeline::{OutcomeResult, Pipeline, PipelineConfig, PipelineError, PipelineOutcome};
pub use progress::{ProgressReporter, Stage, StatusSink};
pub use request::{DownloadError, MediaKind, MediaRequest, MediaSource};
pub use storage::{BucketStorage, Storage, StorageBackend, StorageError};
pub use transcoder::{FfmpegTranscoder, TranscodeMode, Transcoder, TranscoderError};
