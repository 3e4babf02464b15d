//! S3-compatible bucket storage.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

use super::config::ObjectStoreConfig;
use super::error::StorageError;
use super::traits::Storage;
use super::types::{UploadOptions, UploadedReference};

/// Object key probed by `check_access`; it does not need to exist.
const ACCESS_PROBE: &str = ".access-probe";

/// Uploads artifacts as objects under `<prefix>/<request id>/<file name>`.
pub struct BucketStorage {
    store: AmazonS3,
    bucket: String,
    prefix: String,
}

impl BucketStorage {
    /// Builds the S3 client from the environment plus explicit settings.
    pub fn new(config: &ObjectStoreConfig) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone());

        if let Some(ref endpoint) = config.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }
        if let Some(ref key) = config.access_key_id {
            builder = builder.with_access_key_id(key.clone());
        }
        if let Some(ref secret) = config.secret_access_key {
            builder = builder.with_secret_access_key(secret.clone());
        }

        let store = builder.build().map_err(|e| StorageError::DestinationUnreachable {
            destination: config.bucket.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            store,
            bucket: config.bucket.clone(),
            prefix: config.prefix.trim_matches('/').to_string(),
        })
    }

    fn location(&self, group: &str, file_name: &str) -> ObjectPath {
        ObjectPath::from(object_key(&self.prefix, group, file_name))
    }

    fn classify(&self, err: ObjectStoreError) -> StorageError {
        classify_error(&self.bucket, err)
    }
}

/// Joins non-empty key parts with `/`.
pub(crate) fn object_key(prefix: &str, group: &str, file_name: &str) -> String {
    [prefix, group, file_name]
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Maps object store errors onto the storage taxonomy.
pub(crate) fn classify_error(bucket: &str, err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
            StorageError::PermissionDenied {
                destination: bucket.to_string(),
                reason: err.to_string(),
            }
        }
        ObjectStoreError::NotFound { .. } => StorageError::DestinationUnreachable {
            destination: bucket.to_string(),
            reason: err.to_string(),
        },
        other => StorageError::transient(other.to_string()),
    }
}

#[async_trait]
impl Storage for BucketStorage {
    fn name(&self) -> &str {
        "object_store"
    }

    async fn check_access(&self) -> Result<(), StorageError> {
        let probe = self.location("", ACCESS_PROBE);
        match self.store.head(&probe).await {
            Ok(_) | Err(ObjectStoreError::NotFound { .. }) => {
                debug!(bucket = %self.bucket, "Bucket reachable");
                Ok(())
            }
            Err(e) => Err(self.classify(e)),
        }
    }

    async fn upload(
        &self,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<UploadedReference, StorageError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| StorageError::FileNotFound {
                path: path.to_path_buf(),
            })?;

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        let size = data.len() as u64;
        let location = self.location(&options.group, &file_name);
        let start = Instant::now();

        self.store
            .put(&location, PutPayload::from(Bytes::from(data)))
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %location,
                    size_bytes = size,
                    "Object upload failed"
                );
                self.classify(e)
            })?;

        info!(
            bucket = %self.bucket,
            key = %location,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "Object upload successful"
        );

        Ok(UploadedReference {
            destination: self.bucket.clone(),
            locator: location.to_string(),
            file_id: None,
        })
    }

    async fn resolve_path(&self, reference: &UploadedReference) -> Result<String, StorageError> {
        if reference.locator.is_empty() {
            return Err(StorageError::ResolveFailed {
                reason: "reference has no object key".to_string(),
            });
        }
        Ok(reference
            .locator
            .split('/')
            .map(|part| urlencoding::encode(part).into_owned())
            .collect::<Vec<_>>()
            .join("/"))
    }
}
