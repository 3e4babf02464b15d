//! Configuration for the storage module.

use serde::{Deserialize, Serialize};

/// Where uploaded artifacts end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Documents posted to the private Telegram channel.
    Telegram,
    /// Objects in an S3-compatible bucket.
    ObjectStore,
}

/// Storage selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upload to an S3-compatible bucket instead of the Telegram channel.
    #[serde(default)]
    pub use_object_store: bool,

    /// Bucket settings, required when `use_object_store` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_store: Option<ObjectStoreConfig>,
}

impl StorageConfig {
    /// Selected backend.
    pub fn backend(&self) -> StorageBackend {
        if self.use_object_store {
            StorageBackend::ObjectStore
        } else {
            StorageBackend::Telegram
        }
    }
}

/// S3-compatible bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Bucket name.
    pub bucket: String,

    /// Region, also used as the region identifier for S3-compatible providers.
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible providers (e.g. `http://localhost:9000`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Access key. Falls back to the standard AWS environment when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Secret key. Falls back to the standard AWS environment when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    /// Key prefix for every uploaded object.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Public URL under which the bucket's objects are reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_prefix() -> String {
    "hls".to_string()
}

impl ObjectStoreConfig {
    /// Creates a config for `bucket` with default region and prefix.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            prefix: default_prefix(),
            public_base_url: None,
        }
    }

    /// Sets a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Base URL that object keys are appended to for direct links.
    ///
    /// Uses `public_base_url` when set, otherwise path-style
    /// `{endpoint}/{bucket}` for custom endpoints, otherwise the AWS
    /// virtual-hosted form.
    pub fn public_url_base(&self) -> String {
        if let Some(ref base) = self.public_base_url {
            return base.trim_end_matches('/').to_string();
        }
        match self.endpoint {
            Some(ref endpoint) => {
                format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
            }
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        assert_eq!(StorageConfig::default().backend(), StorageBackend::Telegram);

        let config = StorageConfig {
            use_object_store: true,
            object_store: Some(ObjectStoreConfig::new("media")),
        };
        assert_eq!(config.backend(), StorageBackend::ObjectStore);
    }

    #[test]
    fn test_public_url_base_aws() {
        let config = ObjectStoreConfig::new("media");
        assert_eq!(
            config.public_url_base(),
            "https://media.s3.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn test_public_url_base_custom_endpoint() {
        let config = ObjectStoreConfig::new("media").with_endpoint("http://localhost:9000/");
        assert_eq!(config.public_url_base(), "http://localhost:9000/media");
    }

    #[test]
    fn test_public_url_base_explicit() {
        let mut config = ObjectStoreConfig::new("media").with_endpoint("http://minio:9000");
        config.public_base_url = Some("https://cdn.example.com/".to_string());
        assert_eq!(config.public_url_base(), "https://cdn.example.com");
    }
}
