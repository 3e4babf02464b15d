use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::link::{LinkConfig, LinkStrategy};
use crate::pipeline::PipelineConfig;
use crate::storage::{StorageBackend, StorageConfig};
use crate::transcoder::{TranscodeMode, TranscoderConfig};
use crate::uploader::SegmentFailurePolicy;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub link: LinkConfig,
}

/// Telegram credentials and the private storage channel.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Application id from my.telegram.org.
    pub api_id: i64,
    /// Application hash paired with `api_id`.
    pub api_hash: String,
    /// Bot token from BotFather.
    pub bot_token: String,
    /// Storage channel id, usually of the form `-100XXXXXXXXXX`.
    pub channel_id: i64,
}

/// Liveness endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub telegram: SanitizedTelegramConfig,
    pub server: ServerConfig,
    pub pipeline: SanitizedPipelineConfig,
    pub transcoder: SanitizedTranscoderConfig,
    pub storage: SanitizedStorageConfig,
    pub link: SanitizedLinkConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub api_id_configured: bool,
    pub api_hash_configured: bool,
    pub bot_token_configured: bool,
    pub channel_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPipelineConfig {
    pub enable_hls: bool,
    pub max_file_size_mb: u64,
    pub max_concurrent_jobs: usize,
    pub temp_dir: PathBuf,
    pub segment_failure_policy: SegmentFailurePolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTranscoderConfig {
    pub ffmpeg_path: PathBuf,
    pub mode: TranscodeMode,
    pub segment_secs: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub backend: StorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub credentials_configured: bool,
}

/// Link settings; the base URL may embed the bot token so only its presence is shown.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLinkConfig {
    pub strategy: LinkStrategy,
    pub base_url_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let object_store = config.storage.object_store.as_ref();
        Self {
            telegram: SanitizedTelegramConfig {
                api_id_configured: config.telegram.api_id > 0,
                api_hash_configured: !config.telegram.api_hash.is_empty(),
                bot_token_configured: !config.telegram.bot_token.is_empty(),
                channel_id: config.telegram.channel_id,
            },
            server: config.server.clone(),
            pipeline: SanitizedPipelineConfig {
                enable_hls: config.pipeline.enable_hls,
                max_file_size_mb: config.pipeline.max_file_size_mb,
                max_concurrent_jobs: config.pipeline.max_concurrent_jobs,
                temp_dir: config.pipeline.temp_dir.clone(),
                segment_failure_policy: config.pipeline.segment_failure_policy,
            },
            transcoder: SanitizedTranscoderConfig {
                ffmpeg_path: config.transcoder.ffmpeg_path.clone(),
                mode: config.transcoder.mode,
                segment_secs: config.transcoder.segment_secs,
                timeout_secs: config.transcoder.timeout_secs,
            },
            storage: SanitizedStorageConfig {
                backend: config.storage.backend(),
                bucket: object_store.map(|o| o.bucket.clone()),
                endpoint: object_store.and_then(|o| o.endpoint.clone()),
                credentials_configured: object_store
                    .map(|o| o.access_key_id.is_some() && o.secret_access_key.is_some())
                    .unwrap_or(false),
            },
            link: SanitizedLinkConfig {
                strategy: config.link.strategy,
                base_url_configured: config.link.base_url.is_some(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[telegram]
api_id = 12345
api_hash = "0123456789abcdef"
bot_token = "123:ABC"
channel_id = -1001234567890
"#;

    #[test]
    fn test_deserialize_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.telegram.channel_id, -1001234567890);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert!(config.pipeline.enable_hls);
        assert_eq!(config.pipeline.max_file_size_mb, 500);
        assert_eq!(config.transcoder.segment_secs, 4);
        assert_eq!(config.storage.backend(), StorageBackend::Telegram);
        assert_eq!(config.link.strategy, LinkStrategy::DirectFile);
    }

    #[test]
    fn test_deserialize_missing_telegram_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_object_store_section() {
        let toml = format!(
            r#"{MINIMAL}
[storage]
use_object_store = true

[storage.object_store]
bucket = "media"
endpoint = "http://localhost:9000"
access_key_id = "minio"
secret_access_key = "minio123"
"#
        );
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.storage.backend(), StorageBackend::ObjectStore);
        let object_store = config.storage.object_store.as_ref().unwrap();
        assert_eq!(object_store.bucket, "media");
        assert_eq!(object_store.region, "us-east-1");
        assert_eq!(object_store.prefix, "hls");
    }

    #[test]
    fn test_sanitized_config_hides_secrets() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.telegram.bot_token_configured);
        assert!(sanitized.telegram.api_hash_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("123:ABC"));
        assert!(!json.contains("0123456789abcdef"));
    }
}
