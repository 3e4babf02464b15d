//! Mock status sink for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::progress::{StatusError, StatusHandle, StatusSink};

/// One status message and every text it has shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStatus {
    pub handle: StatusHandle,
    /// Initial text followed by each edit, in order.
    pub texts: Vec<String>,
}

/// Mock implementation of the StatusSink trait.
///
/// Records every message and edit, and can fail the next create or edit.
#[derive(Debug, Clone, Default)]
pub struct MockStatusSink {
    messages: Arc<RwLock<Vec<RecordedStatus>>>,
    edits: Arc<RwLock<usize>>,
    next_create_error: Arc<RwLock<Option<StatusError>>>,
    next_edit_error: Arc<RwLock<Option<StatusError>>>,
}

impl MockStatusSink {
    /// Create a new mock sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded status messages.
    pub async fn messages(&self) -> Vec<RecordedStatus> {
        self.messages.read().await.clone()
    }

    /// Number of status messages created.
    pub async fn created_count(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Number of successful edits.
    pub async fn edit_count(&self) -> usize {
        *self.edits.read().await
    }

    /// Texts shown in `chat_id`, across all its messages.
    pub async fn texts(&self, chat_id: i64) -> Vec<String> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|m| m.handle.chat_id == chat_id)
            .flat_map(|m| m.texts.iter().cloned())
            .collect()
    }

    /// Latest text shown in `chat_id`.
    pub async fn last_text(&self, chat_id: i64) -> Option<String> {
        self.texts(chat_id).await.pop()
    }

    /// Configure the next create to fail.
    pub async fn set_next_create_error(&self, error: StatusError) {
        *self.next_create_error.write().await = Some(error);
    }

    /// Configure the next edit to fail.
    pub async fn set_next_edit_error(&self, error: StatusError) {
        *self.next_edit_error.write().await = Some(error);
    }
}

#[async_trait]
impl StatusSink for MockStatusSink {
    async fn create(&self, chat_id: i64, text: &str) -> Result<StatusHandle, StatusError> {
        if let Some(e) = self.next_create_error.write().await.take() {
            return Err(e);
        }
        let mut messages = self.messages.write().await;
        let handle = StatusHandle {
            chat_id,
            message_id: messages.len() as i32 + 1,
        };
        messages.push(RecordedStatus {
            handle,
            texts: vec![text.to_string()],
        });
        Ok(handle)
    }

    async fn edit(&self, handle: &StatusHandle, text: &str) -> Result<(), StatusError> {
        if let Some(e) = self.next_edit_error.write().await.take() {
            return Err(e);
        }
        let mut messages = self.messages.write().await;
        let message = messages
            .iter_mut()
            .find(|m| m.handle == *handle)
            .ok_or_else(|| StatusError::EditFailed {
                reason: "message to edit not found".to_string(),
            })?;
        message.texts.push(text.to_string());
        *self.edits.write().await += 1;
        Ok(())
    }
}
