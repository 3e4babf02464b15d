//! Status messages in the sender's chat.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::MessageId;

use super::errors::is_message_not_modified;
use crate::progress::{StatusError, StatusHandle, StatusSink};

/// Sends and edits plain-text status messages.
#[derive(Clone)]
pub struct TelegramStatusSink {
    bot: Bot,
}

impl TelegramStatusSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl StatusSink for TelegramStatusSink {
    async fn create(&self, chat_id: i64, text: &str) -> Result<StatusHandle, StatusError> {
        let message = self
            .bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| StatusError::SendFailed {
                reason: e.to_string(),
            })?;
        Ok(StatusHandle {
            chat_id,
            message_id: message.id.0,
        })
    }

    async fn edit(&self, handle: &StatusHandle, text: &str) -> Result<(), StatusError> {
        match self
            .bot
            .edit_message_text(ChatId(handle.chat_id), MessageId(handle.message_id), text)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_message_not_modified(&e) => Ok(()),
            Err(e) => Err(StatusError::EditFailed {
                reason: e.to_string(),
            }),
        }
    }
}
