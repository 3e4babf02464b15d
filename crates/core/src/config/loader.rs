use figment::{
    providers::{Env, Format, Toml},
    value::Uncased,
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for structured environment overrides, e.g. `HLS_RELAY_PIPELINE__ENABLE_HLS`.
pub const ENV_PREFIX: &str = "HLS_RELAY_";

/// Flat variable names accepted for compatibility with existing deployments.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("API_ID", "telegram.api_id"),
    ("API_HASH", "telegram.api_hash"),
    ("BOT_TOKEN", "telegram.bot_token"),
    ("CHANNEL_ID", "telegram.channel_id"),
    ("PORT", "server.port"),
    ("MAX_FILE_SIZE_MB", "pipeline.max_file_size_mb"),
    ("ENABLE_HLS", "pipeline.enable_hls"),
    ("USE_OBJECT_STORE", "storage.use_object_store"),
];

/// Load configuration from an optional TOML file, then environment overrides.
///
/// A missing file is not an error: the bot is normally configured purely
/// through the environment.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(legacy_env())
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn legacy_env() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| Uncased::from(*path))
            .unwrap_or_else(|| Uncased::from(key.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[telegram]
api_id = 1
api_hash = "hash"
bot_token = "1:token"
channel_id = -1001

[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_missing_telegram() {
        let toml = r#"
[server]
port = 8080
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[telegram]
api_id = 42
api_hash = "hash"
bot_token = "1:token"
channel_id = -1009

[server]
host = "127.0.0.1"
port = 3000

[pipeline]
max_file_size_mb = 100
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.pipeline.max_file_size_mb, 100);
        assert_eq!(config.telegram.api_id, 42);
    }

    #[test]
    fn test_legacy_env_keys_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("API_ID", "777");
            jail.set_env("API_HASH", "abc");
            jail.set_env("BOT_TOKEN", "9:xyz");
            jail.set_env("CHANNEL_ID", "-1005550001");
            jail.set_env("MAX_FILE_SIZE_MB", "250");
            jail.set_env("ENABLE_HLS", "false");

            let config = load_config(Path::new("does-not-exist.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.telegram.api_id, 777);
            assert_eq!(config.telegram.bot_token, "9:xyz");
            assert_eq!(config.telegram.channel_id, -1005550001);
            assert_eq!(config.pipeline.max_file_size_mb, 250);
            assert!(!config.pipeline.enable_hls);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "relay.toml",
                r#"
[telegram]
api_id = 1
api_hash = "hash"
bot_token = "1:token"
channel_id = -1001

[transcoder]
segment_secs = 6
"#,
            )?;
            jail.set_env("HLS_RELAY_TRANSCODER__SEGMENT_SECS", "5");
            jail.set_env("HLS_RELAY_PIPELINE__MAX_CONCURRENT_JOBS", "2");

            let config =
                load_config(Path::new("relay.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.transcoder.segment_secs, 5);
            assert_eq!(config.pipeline.max_concurrent_jobs, 2);
            Ok(())
        });
    }
}
