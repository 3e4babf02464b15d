//! Link resolver implementations.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::error::LinkError;
use super::types::{LinkStrategy, ResultLink};
use crate::config::Config;
use crate::storage::{Storage, StorageBackend, UploadedReference};

/// Default base for Telegram file downloads; the bot token is appended.
pub const TELEGRAM_FILE_BASE: &str = "https://api.telegram.org/file/bot";

/// Default base for links to private channel posts.
pub const TELEGRAM_DEEP_LINK_BASE: &str = "https://t.me/c";

/// Prefix Telegram puts in front of channel ids in the Bot API.
const CHANNEL_ID_PREFIX: &str = "-100";

/// Turns an uploaded reference into a user-facing link.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    fn strategy(&self) -> LinkStrategy;

    async fn resolve(
        &self,
        storage: &dyn Storage,
        reference: &UploadedReference,
    ) -> Result<ResultLink, LinkError>;
}

/// `<base>/<remote file path>`.
#[derive(Debug, Clone)]
pub struct DirectFileLinks {
    base_url: String,
}

impl DirectFileLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Links served by the Bot API file endpoint.
    pub fn telegram(bot_token: &str) -> Self {
        Self::new(format!("{}{}", TELEGRAM_FILE_BASE, bot_token))
    }
}

#[async_trait]
impl LinkResolver for DirectFileLinks {
    fn strategy(&self) -> LinkStrategy {
        LinkStrategy::DirectFile
    }

    async fn resolve(
        &self,
        storage: &dyn Storage,
        reference: &UploadedReference,
    ) -> Result<ResultLink, LinkError> {
        let path = storage.resolve_path(reference).await?;
        debug!(storage = storage.name(), %path, "Resolved remote file path");
        Ok(ResultLink {
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            strategy: LinkStrategy::DirectFile,
        })
    }
}

/// `<base>/<destination>/<locator>`.
#[derive(Debug, Clone)]
pub struct DeepLinks {
    base_url: String,
}

impl DeepLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for DeepLinks {
    fn default() -> Self {
        Self::new(TELEGRAM_DEEP_LINK_BASE)
    }
}

#[async_trait]
impl LinkResolver for DeepLinks {
    fn strategy(&self) -> LinkStrategy {
        LinkStrategy::DeepLink
    }

    async fn resolve(
        &self,
        _storage: &dyn Storage,
        reference: &UploadedReference,
    ) -> Result<ResultLink, LinkError> {
        if reference.destination.is_empty() || reference.locator.is_empty() {
            return Err(LinkError::IncompleteReference {
                reason: "destination and locator are required".to_string(),
            });
        }
        // t.me/c only addresses channels and supergroups; other negative
        // ids (basic groups) have no deep link form.
        let destination = match reference.destination.strip_prefix(CHANNEL_ID_PREFIX) {
            Some(id) => id,
            None if reference.destination.starts_with('-') => {
                return Err(LinkError::IncompleteReference {
                    reason: format!(
                        "{} is not a channel id; deep links need a -100 prefixed id",
                        reference.destination
                    ),
                });
            }
            None => reference.destination.as_str(),
        };
        Ok(ResultLink {
            url: format!("{}/{}/{}", self.base_url, destination, reference.locator),
            strategy: LinkStrategy::DeepLink,
        })
    }
}

/// Create a link resolver from configuration.
pub fn create_link_resolver(config: &Config) -> Arc<dyn LinkResolver> {
    let explicit = config.link.base_url.clone();
    match config.link.strategy {
        LinkStrategy::DirectFile => {
            let base = explicit.unwrap_or_else(|| match config.storage.backend() {
                StorageBackend::Telegram => {
                    format!("{}{}", TELEGRAM_FILE_BASE, config.telegram.bot_token)
                }
                StorageBackend::ObjectStore => config
                    .storage
                    .object_store
                    .as_ref()
                    .map(|o| o.public_url_base())
                    .unwrap_or_default(),
            });
            Arc::new(DirectFileLinks::new(base))
        }
        LinkStrategy::DeepLink => Arc::new(
            explicit
                .map(DeepLinks::new)
                .unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use crate::storage::{StorageError, UploadOptions};
    use crate::testing::MockStorage;
    use std::path::Path;

    const CONFIG: &str = r#"
[telegram]
api_id = 1
api_hash = "hash"
bot_token = "123:ABC"
channel_id = -1001234567890
"#;

    fn reference(locator: &str) -> UploadedReference {
        UploadedReference {
            destination: "-1001234567890".to_string(),
            locator: locator.to_string(),
            file_id: Some("file-index.m3u8".to_string()),
        }
    }

    #[tokio::test]
    async fn test_direct_file_link() {
        let storage = MockStorage::new();
        let links = DirectFileLinks::telegram("123:ABC");
        let link = links.resolve(&storage, &reference("7")).await.unwrap();
        assert_eq!(
            link.url,
            "https://api.telegram.org/file/bot123:ABC/documents/file-index.m3u8"
        );
        assert_eq!(link.strategy, LinkStrategy::DirectFile);
    }

    #[tokio::test]
    async fn test_direct_file_link_resolve_failure() {
        let storage = MockStorage::new();
        storage
            .set_resolve_error(StorageError::ResolveFailed {
                reason: "file is too big".to_string(),
            })
            .await;
        let err = DirectFileLinks::telegram("t")
            .resolve(&storage, &reference("7"))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::Resolve(_)));
    }

    #[tokio::test]
    async fn test_deep_link_strips_channel_prefix() {
        let storage = MockStorage::new();
        let link = DeepLinks::default()
            .resolve(&storage, &reference("42"))
            .await
            .unwrap();
        assert_eq!(link.url, "https://t.me/c/1234567890/42");
    }

    #[tokio::test]
    async fn test_deep_link_rejects_basic_group_id() {
        let storage = MockStorage::new();
        let mut basic_group = reference("42");
        basic_group.destination = "-12345".to_string();
        let err = DeepLinks::default()
            .resolve(&storage, &basic_group)
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::IncompleteReference { .. }));
    }

    #[tokio::test]
    async fn test_deep_link_requires_locator() {
        let storage = MockStorage::new();
        let err = DeepLinks::default()
            .resolve(&storage, &reference(""))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::IncompleteReference { .. }));
    }

    #[tokio::test]
    async fn test_create_link_resolver_defaults() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolver = create_link_resolver(&config);
        assert_eq!(resolver.strategy(), LinkStrategy::DirectFile);

        let storage = MockStorage::new();
        let uploaded = storage
            .upload(Path::new("/w/index.m3u8"), &UploadOptions::new("req"))
            .await
            .unwrap();
        let link = resolver.resolve(&storage, &uploaded).await.unwrap();
        assert!(link.url.starts_with("https://api.telegram.org/file/bot123:ABC/"));
    }

    #[test]
    fn test_create_link_resolver_deep_link() {
        let mut config = load_config_from_str(CONFIG).unwrap();
        config.link.strategy = LinkStrategy::DeepLink;
        assert_eq!(
            create_link_resolver(&config).strategy(),
            LinkStrategy::DeepLink
        );
    }
}
