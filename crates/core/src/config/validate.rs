use super::{types::Config, ConfigError};
use crate::link::LinkStrategy;
use crate::storage::StorageBackend;

/// Shortest and longest accepted HLS segment duration, in seconds.
const SEGMENT_SECS_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Validate configuration.
///
/// Everything checked here is fatal at startup; the bot never starts
/// half-configured.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let telegram = &config.telegram;
    if telegram.api_id <= 0 {
        return Err(invalid("telegram.api_id must be a positive integer"));
    }
    if telegram.api_hash.trim().is_empty() {
        return Err(invalid("telegram.api_hash cannot be empty"));
    }
    if telegram.bot_token.trim().is_empty() {
        return Err(invalid("telegram.bot_token cannot be empty"));
    }
    if telegram.channel_id == 0 {
        return Err(invalid("telegram.channel_id cannot be 0"));
    }

    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if !SEGMENT_SECS_RANGE.contains(&config.transcoder.segment_secs) {
        return Err(invalid(format!(
            "transcoder.segment_secs must be between {} and {}",
            SEGMENT_SECS_RANGE.start(),
            SEGMENT_SECS_RANGE.end()
        )));
    }
    if config.transcoder.timeout_secs == 0 {
        return Err(invalid("transcoder.timeout_secs cannot be 0"));
    }

    if config.pipeline.max_file_size_mb == 0 {
        return Err(invalid("pipeline.max_file_size_mb cannot be 0"));
    }

    if config.storage.backend() == StorageBackend::ObjectStore {
        let object_store = config.storage.object_store.as_ref().ok_or_else(|| {
            invalid("storage.object_store must be set when use_object_store is enabled")
        })?;
        if object_store.bucket.trim().is_empty() {
            return Err(invalid("storage.object_store.bucket cannot be empty"));
        }
        if config.link.strategy == LinkStrategy::DeepLink && config.link.base_url.is_none() {
            return Err(invalid(
                "link.base_url must be set to use deep links with object storage",
            ));
        }
    }

    Ok(())
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(reason.into())
}
