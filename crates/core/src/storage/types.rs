//! Types for the storage module.

use serde::{Deserialize, Serialize};

/// Per-upload options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Groups the uploads of one request (the request id).
    pub group: String,
    /// Caption attached to the upload, where the backend supports one.
    pub caption: Option<String>,
}

impl UploadOptions {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Handle to one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedReference {
    /// Channel id or bucket name.
    pub destination: String,
    /// Message id or object key.
    pub locator: String,
    /// Remote file id, when the backend assigns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}
