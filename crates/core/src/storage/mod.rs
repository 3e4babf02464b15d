//! Storage module for the destination of uploaded artifacts.
//!
//! The `Storage` trait is the seam between the pipeline and wherever files
//! end up. Two backends exist: the private Telegram channel
//! (`telegram::ChannelStorage`) and an S3-compatible bucket
//! ([`BucketStorage`]).
//!
//! Errors are classified so callers can tell a destination the bot cannot
//! write to (an operator must fix it) from a transient network failure.

mod bucket;
mod config;
mod error;
mod traits;
mod types;

pub use bucket::BucketStorage;
pub use config::{ObjectStoreConfig, StorageBackend, StorageConfig};
pub use error::StorageError;
pub use traits::Storage;
pub use types::{UploadOptions, UploadedReference};
