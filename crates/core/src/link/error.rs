//! Error types for the link module.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while building a link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The storage backend could not locate the uploaded file.
    #[error("Failed to resolve file path: {0}")]
    Resolve(#[from] StorageError),

    /// The reference lacks what this strategy needs.
    #[error("Incomplete reference: {reason}")]
    IncompleteReference { reason: String },
}
