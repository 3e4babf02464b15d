//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::uploader::SegmentFailurePolicy;

/// Configuration for request processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Convert to HLS before uploading. When off, the original is uploaded as is.
    #[serde(default = "default_true")]
    pub enable_hls: bool,

    /// Files at or above this size are refused before download.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Requests allowed in the convert and upload stages at once. 0 means unbounded.
    #[serde(default)]
    pub max_concurrent_jobs: usize,

    /// Parent directory for per-request workspaces.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// What to do when a single segment fails to upload.
    #[serde(default)]
    pub segment_failure_policy: SegmentFailurePolicy,
}

fn default_true() -> bool {
    true
}

fn default_max_file_size_mb() -> u64 {
    500
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("hls-relay")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enable_hls: default_true(),
            max_file_size_mb: default_max_file_size_mb(),
            max_concurrent_jobs: 0,
            temp_dir: default_temp_dir(),
            segment_failure_policy: SegmentFailurePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Size limit in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Sets the workspace parent directory.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the size limit in megabytes.
    pub fn with_max_file_size_mb(mut self, max_file_size_mb: u64) -> Self {
        self.max_file_size_mb = max_file_size_mb;
        self
    }

    /// Enables or disables HLS conversion.
    pub fn with_hls(mut self, enable_hls: bool) -> Self {
        self.enable_hls = enable_hls;
        self
    }

    /// Sets the segment failure policy.
    pub fn with_segment_failure_policy(mut self, policy: SegmentFailurePolicy) -> Self {
        self.segment_failure_policy = policy;
        self
    }

    /// Sets the admission limit.
    pub fn with_max_concurrent_jobs(mut self, max_concurrent_jobs: usize) -> Self {
        self.max_concurrent_jobs = max_concurrent_jobs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.enable_hls);
        assert_eq!(config.max_file_size_mb, 500);
        assert_eq!(config.max_file_size_bytes(), 500 * 1024 * 1024);
        assert_eq!(config.max_concurrent_jobs, 0);
        assert_eq!(config.segment_failure_policy, SegmentFailurePolicy::Abort);
    }

    #[test]
    fn test_policy_deserialization() {
        let config: PipelineConfig =
            toml::from_str("segment_failure_policy = \"continue\"").unwrap();
        assert_eq!(config.segment_failure_policy, SegmentFailurePolicy::Continue);
    }
}
