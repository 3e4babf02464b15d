//! Trait definitions for the progress module.

use async_trait::async_trait;

use super::error::StatusError;
use super::types::StatusHandle;

/// Transport for the per-request status message.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Sends a new status message to `chat_id`.
    async fn create(&self, chat_id: i64, text: &str) -> Result<StatusHandle, StatusError>;

    /// Replaces the text of an existing status message.
    async fn edit(&self, handle: &StatusHandle, text: &str) -> Result<(), StatusError>;
}
