//! Error types for the progress module.

use thiserror::Error;

/// Errors from the status message transport.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The status message could not be sent.
    #[error("Failed to send status message: {reason}")]
    SendFailed { reason: String },

    /// The status message could not be edited.
    #[error("Failed to edit status message: {reason}")]
    EditFailed { reason: String },
}
