//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while uploading to or resolving from storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The bot lacks rights on the destination.
    #[error("Permission denied on {destination}: {reason}")]
    PermissionDenied { destination: String, reason: String },

    /// The destination does not exist or cannot be reached by the bot.
    #[error("Destination unreachable: {destination}: {reason}")]
    DestinationUnreachable { destination: String, reason: String },

    /// Network or service hiccup; a later attempt may succeed.
    #[error("Transient storage failure: {reason}")]
    Transient { reason: String },

    /// The destination refused this particular file.
    #[error("Upload of {path} rejected: {reason}")]
    Rejected { path: PathBuf, reason: String },

    /// The remote path of an uploaded file could not be obtained.
    #[error("Failed to resolve uploaded file: {reason}")]
    ResolveFailed { reason: String },

    /// Local file to upload does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error while reading the local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Creates a transient error.
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient {
            reason: reason.into(),
        }
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Io(_))
    }

    /// Whether an operator has to change something before uploads can work.
    ///
    /// Once one of these shows up, every later upload to the same destination
    /// fails the same way.
    pub fn requires_out_of_band_fix(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. } | Self::DestinationUnreachable { .. }
        )
    }

    /// What the operator should do about it, if anything.
    pub fn remediation(&self) -> Option<String> {
        match self {
            Self::PermissionDenied { destination, .. } => Some(format!(
                "Make the bot an administrator of {} with permission to post messages.",
                destination
            )),
            Self::DestinationUnreachable { destination, .. } => Some(format!(
                "Check that {} exists and that the bot has been added to it.",
                destination
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let denied = StorageError::PermissionDenied {
            destination: "-1001234".to_string(),
            reason: "not enough rights".to_string(),
        };
        assert!(!denied.is_retryable());
        assert!(denied.requires_out_of_band_fix());
        assert!(denied.remediation().unwrap().contains("administrator"));

        let transient = StorageError::transient("connection reset");
        assert!(transient.is_retryable());
        assert!(!transient.requires_out_of_band_fix());
        assert!(transient.remediation().is_none());

        let rejected = StorageError::Rejected {
            path: PathBuf::from("/w/big.ts"),
            reason: "file too big".to_string(),
        };
        assert!(!rejected.is_retryable());
        assert!(!rejected.requires_out_of_band_fix());
    }
}
